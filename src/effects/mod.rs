//! Presentation effects and the orchestrator that installs them.
//!
//! Page-ready effects are installed immediately; the decorative ones follow
//! after `deferred_init_delay_ms`. A failing effect is logged and skipped,
//! the rest still install.

pub mod cards;
pub mod cursor_trail;
pub mod easter_egg;
pub mod hero;
pub mod loading_screen;
pub mod navigation;
pub mod parallax;
pub mod scroll_animations;
pub mod scroll_progress;
pub mod smooth_scroll;
pub mod timeline;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::logging::{log_event, LogLevel};
use crate::page::{Page, Subscription};

use self::cursor_trail::CursorTrail;

const BANNER: [(&str, &str); 3] = [
    (
        "%c⚔️ TITAN PORTFOLIO",
        "font-size: 24px; font-weight: bold; color: #8b1e1e;",
    ),
    ("%cScout Regiment Archives", "font-size: 14px; color: #9d7e5f;"),
    (
        "%cThose who see data clearly control the battlefield.",
        "font-style: italic; color: #f4f1ea;",
    ),
];

type Installer<P> = fn(&Rc<P>, &EffectsConfig) -> EffectResult<Vec<Subscription>>;

#[derive(Default)]
struct Installed {
    subscriptions: Vec<Subscription>,
    cursor_trail: Option<CursorTrail>,
    skipped: Vec<&'static str>,
}

impl Installed {
    fn run<P: Page + 'static>(
        &mut self,
        page: &Rc<P>,
        config: &EffectsConfig,
        name: &'static str,
        installer: Installer<P>,
    ) {
        match installer(page, config) {
            Ok(subscriptions) => self.subscriptions.extend(subscriptions),
            Err(error) => self.skip(&**page, config, name, &error.to_string()),
        }
    }

    fn skip<P: Page + ?Sized>(
        &mut self,
        page: &P,
        config: &EffectsConfig,
        name: &'static str,
        error: &str,
    ) {
        log_event(
            page,
            config,
            LogLevel::Warn,
            "effect_skipped",
            json!({ "effect": name, "error": error }),
        );
        self.skipped.push(name);
    }
}

/// Owns every installed effect. Dropping it tears them all down.
pub struct EffectsHandle {
    // Declared first so a pending deferred install is cancelled before the
    // installed effects are released.
    _deferred: Subscription,
    installed: Rc<RefCell<Installed>>,
}

impl EffectsHandle {
    /// Effects that failed to install, by name.
    pub fn skipped(&self) -> Vec<&'static str> {
        self.installed.borrow().skipped.clone()
    }

    pub fn subscription_count(&self) -> usize {
        self.installed.borrow().subscriptions.len()
    }

    pub fn cursor_trail_running(&self) -> bool {
        self.installed
            .borrow()
            .cursor_trail
            .as_ref()
            .is_some_and(CursorTrail::is_running)
    }

    pub fn stop_cursor_trail(&self) {
        if let Some(trail) = self.installed.borrow().cursor_trail.as_ref() {
            trail.stop();
        }
    }
}

pub fn print_banner<P: Page + ?Sized>(page: &P) {
    for (message, css) in BANNER {
        page.console_log(message, Some(css));
    }
}

pub fn install_all<P: Page + 'static>(page: Rc<P>) -> EffectsHandle {
    let config = EffectsConfig::load(&*page);
    let installed = Rc::new(RefCell::new(Installed::default()));

    {
        let mut installed = installed.borrow_mut();
        if let Err(error) = easter_egg::install_keyframes(&*page) {
            installed.skip(&*page, &config, "keyframes", &error.to_string());
        }

        installed.run(&page, &config, "loading_screen", loading_screen::install);
        installed.run(&page, &config, "navigation", navigation::install);
        installed.run(&page, &config, "scroll_animations", scroll_animations::install);
        installed.run(&page, &config, "smooth_scroll", smooth_scroll::install);
        installed.run(&page, &config, "parallax", parallax::install);
    }

    let deferred = {
        let page = Rc::clone(&page);
        let installed = Rc::clone(&installed);
        let config = config.clone();
        Box::new(move || install_deferred(&page, &config, &installed))
    };
    let deferred = page.set_timeout(config.deferred_init_delay_ms, deferred);

    print_banner(&*page);
    log_event(
        &*page,
        &config,
        LogLevel::Info,
        "effects_installed",
        json!({
            "subscriptions": installed.borrow().subscriptions.len(),
            "skipped": installed.borrow().skipped,
        }),
    );

    EffectsHandle {
        _deferred: deferred,
        installed,
    }
}

fn install_deferred<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
    installed: &Rc<RefCell<Installed>>,
) {
    let mut installed = installed.borrow_mut();

    installed.run(page, config, "hero_glow", hero::install_glow);
    installed.run(page, config, "typing", hero::install_typing);

    match cursor_trail::install(page, config) {
        Ok(Some(trail)) => installed.cursor_trail = Some(trail),
        Ok(None) => log_event(
            &**page,
            config,
            LogLevel::Debug,
            "cursor_trail_disabled",
            json!({ "viewport_width": page.viewport_width() }),
        ),
        Err(error) => installed.skip(&**page, config, "cursor_trail", &error.to_string()),
    }

    installed.run(page, config, "project_tilt", cards::install_project_tilt);
    installed.run(page, config, "skill_pulse", cards::install_skill_pulse);
    installed.run(page, config, "contact_spin", cards::install_contact_spin);
    installed.run(page, config, "scroll_progress", scroll_progress::install);
    installed.run(page, config, "timeline", timeline::install);
    installed.run(page, config, "easter_egg", easter_egg::install);

    log_event(
        &**page,
        config,
        LogLevel::Info,
        "deferred_effects_installed",
        json!({
            "subscriptions": installed.subscriptions.len(),
            "cursor_trail": installed.cursor_trail.is_some(),
        }),
    );
}
