use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::json;

use crate::config::EffectsConfig;
use crate::error::{EffectError, EffectResult};
use crate::logging::{log_event, LogLevel};
use crate::page::{ElementSpec, EventKind, Page, PageEvent, Subscription, Target};

pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];
pub const OVERLAY_TEXT: &str = "🔥 SCOUT MODE ACTIVATED 🔥";
pub const OVERLAY_LIFETIME_MS: u32 = 3_000;
pub const BODY_ANIMATION: &str = "scoutActivation 2s ease";

const OVERLAY_CSS: &str = "position: fixed; top: 50%; left: 50%; \
     transform: translate(-50%, -50%); font-family: 'Cinzel', serif; font-size: 3rem; \
     color: #8b1e1e; text-shadow: 0 0 30px rgba(139, 30, 30, 0.8); z-index: 10002; \
     animation: fadeInOut 3s ease; pointer-events: none;";

pub const KEYFRAMES_CSS: &str = "
    @keyframes scoutActivation {
        0%, 100% { filter: hue-rotate(0deg); }
        50% { filter: hue-rotate(180deg); }
    }

    @keyframes fadeInOut {
        0%, 100% { opacity: 0; transform: translate(-50%, -50%) scale(0.8); }
        50% { opacity: 1; transform: translate(-50%, -50%) scale(1.2); }
    }
";

/// Rolling window of the most recent keys, never longer than the pattern.
#[derive(Debug)]
pub struct KeySequence {
    pattern: &'static [&'static str],
    recent: VecDeque<String>,
}

impl KeySequence {
    pub fn new(pattern: &'static [&'static str]) -> Self {
        Self {
            pattern,
            recent: VecDeque::with_capacity(pattern.len() + 1),
        }
    }

    pub fn konami() -> Self {
        Self::new(&KONAMI_CODE)
    }

    /// Records a key and reports whether the window now equals the pattern.
    pub fn push(&mut self, key: &str) -> bool {
        self.recent.push_back(key.to_string());
        while self.recent.len() > self.pattern.len() {
            self.recent.pop_front();
        }

        self.recent.len() == self.pattern.len()
            && self
                .recent
                .iter()
                .zip(self.pattern)
                .all(|(recent, expected)| recent.as_str() == *expected)
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}

/// Adds the keyframes the overlay and the body animation rely on.
pub fn install_keyframes<P: Page + ?Sized>(page: &P) -> EffectResult<()> {
    let head = page
        .head()
        .ok_or_else(|| EffectError::element_not_found("head"))?;
    page.append_element(&head, ElementSpec::new("style").text(KEYFRAMES_CSS))?;
    Ok(())
}

/// Overlays are not de-duplicated: each match appends its own message.
fn activate<P: Page + 'static>(page: &Rc<P>, config: &EffectsConfig) -> EffectResult<()> {
    let body = page.require_body()?;
    page.set_style(&body, "animation", BODY_ANIMATION);

    let message = page.append_element(
        &body,
        ElementSpec::new("div").css(OVERLAY_CSS).text(OVERLAY_TEXT),
    )?;
    let dismiss = {
        let page = Rc::clone(page);
        Box::new(move || page.remove_element(&message))
    };
    page.set_timeout(OVERLAY_LIFETIME_MS, dismiss).detach();

    log_event(&**page, config, LogLevel::Info, "easter_egg_activated", json!({}));
    Ok(())
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let mut sequence = KeySequence::konami();

    let on_key = {
        let page = Rc::clone(page);
        let config = config.clone();
        Box::new(move |event: &mut PageEvent<P::Node>| {
            let Some(key) = event.key.as_deref() else {
                return;
            };
            if !sequence.push(key) {
                return;
            }
            if let Err(error) = activate(&page, &config) {
                log_event(
                    &*page,
                    &config,
                    LogLevel::Warn,
                    "easter_egg_failed",
                    json!({ "error": error.to_string() }),
                );
            }
        })
    };

    Ok(vec![page.listen(Target::Document, EventKind::KeyDown, on_key)])
}
