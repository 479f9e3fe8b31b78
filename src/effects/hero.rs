use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{EventKind, Page, PageEvent, Subscription, SubscriptionSlot, Target};

pub const HERO_TITLE_SELECTOR: &str = ".hero-title";
pub const HERO_SUBTITLE_SELECTOR: &str = ".hero-subtitle";
pub const TITLE_GLOW: &str = "0 0 50px rgba(139, 30, 30, 0.5)";
pub const TITLE_REST: &str = "0 0 30px rgba(139, 30, 30, 0.3)";

pub fn install_glow<P: Page + 'static>(
    page: &Rc<P>,
    _config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let title = page.require(HERO_TITLE_SELECTOR)?;

    let on_enter = {
        let page = Rc::clone(page);
        let title = title.clone();
        Box::new(move |_: &mut PageEvent<P::Node>| {
            page.set_style(&title, "text-shadow", TITLE_GLOW)
        })
    };
    let on_leave = {
        let page = Rc::clone(page);
        let title = title.clone();
        Box::new(move |_: &mut PageEvent<P::Node>| {
            page.set_style(&title, "text-shadow", TITLE_REST)
        })
    };

    Ok(vec![
        page.listen(Target::Element(title.clone()), EventKind::MouseEnter, on_enter),
        page.listen(Target::Element(title), EventKind::MouseLeave, on_leave),
    ])
}

/// Reveals a string one character at a time.
#[derive(Clone, Debug)]
pub struct Typewriter {
    chars: Vec<char>,
    typed: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            typed: 0,
        }
    }

    /// Types the next character and returns everything typed so far, or
    /// `None` once the text is complete.
    pub fn advance(&mut self) -> Option<String> {
        if self.typed >= self.chars.len() {
            return None;
        }
        self.typed += 1;
        Some(self.chars[..self.typed].iter().collect())
    }

    pub fn is_done(&self) -> bool {
        self.typed >= self.chars.len()
    }
}

fn type_next<P: Page + 'static>(
    page: Rc<P>,
    subtitle: P::Node,
    mut typewriter: Typewriter,
    slot: SubscriptionSlot,
    interval_ms: u32,
) {
    let Some(typed) = typewriter.advance() else {
        return;
    };
    page.set_text_content(&subtitle, &typed);
    if typewriter.is_done() {
        return;
    }

    let next = {
        let page = Rc::clone(&page);
        let slot = slot.clone();
        Box::new(move || type_next(page, subtitle, typewriter, slot, interval_ms))
    };
    slot.replace(page.set_timeout(interval_ms, next));
}

pub fn install_typing<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let subtitle = page.require(HERO_SUBTITLE_SELECTOR)?;
    let typewriter = Typewriter::new(&page.text_content(&subtitle));
    page.set_text_content(&subtitle, "");
    page.set_style(&subtitle, "opacity", "1");

    let slot = SubscriptionSlot::new();
    let interval_ms = config.typing_char_interval_ms;
    let start = {
        let page = Rc::clone(page);
        let slot = slot.clone();
        Box::new(move || type_next(page, subtitle, typewriter, slot, interval_ms))
    };
    slot.replace(page.set_timeout(config.typing_start_delay_ms, start));

    Ok(vec![slot.guard()])
}
