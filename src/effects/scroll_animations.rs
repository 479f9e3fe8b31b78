use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{IntersectionEntry, ObserverOptions, Page, Subscription};

/// Observed groups, in the order their stagger index is assigned.
pub const REVEAL_SELECTORS: [&str; 6] = [
    ".section",
    ".skill-category",
    ".timeline-item",
    ".project-card",
    ".education-card",
    ".contact-card",
];
pub const REVEAL_CLASS: &str = "reveal";
pub const REVEALED_CLASS: &str = "active";
pub const REVEAL_THRESHOLD: f64 = 0.15;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";
pub const REVEAL_STAGGER_MS: u32 = 100;

pub const SKILL_TAG_SELECTOR: &str = ".skill-tag";
pub const SKILL_TAG_STAGGER_MS: u32 = 100;

pub fn stagger_delay(index: usize, step_ms: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(step_ms)
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    _config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let mut subscriptions = Vec::new();

    let elements: Vec<P::Node> = REVEAL_SELECTORS
        .iter()
        .flat_map(|selector| page.query_selector_all(selector))
        .collect();

    for (index, element) in elements.iter().enumerate() {
        page.add_class(element, REVEAL_CLASS);
        page.set_style(
            element,
            "transition-delay",
            &format!("{}ms", stagger_delay(index, REVEAL_STAGGER_MS)),
        );
    }

    if !elements.is_empty() {
        let on_intersect = {
            let page = Rc::clone(page);
            Box::new(move |entries: &[IntersectionEntry<P::Node>]| {
                for entry in entries.iter().filter(|entry| entry.is_intersecting) {
                    page.add_class(&entry.target, REVEALED_CLASS);
                }
            })
        };
        subscriptions.push(page.observe_intersections(
            &elements,
            ObserverOptions::new(REVEAL_THRESHOLD, REVEAL_ROOT_MARGIN),
            on_intersect,
        )?);
    }

    for (index, tag) in page.query_selector_all(SKILL_TAG_SELECTOR).into_iter().enumerate() {
        page.set_style(&tag, "opacity", "0");
        page.set_style(&tag, "transform", "translateY(20px)");
        page.set_style(&tag, "transition", "all 0.5s ease");

        let fade_in = {
            let page = Rc::clone(page);
            Box::new(move || {
                page.set_style(&tag, "opacity", "1");
                page.set_style(&tag, "transform", "translateY(0)");
            })
        };
        subscriptions.push(page.set_timeout(stagger_delay(index, SKILL_TAG_STAGGER_MS), fade_in));
    }

    Ok(subscriptions)
}
