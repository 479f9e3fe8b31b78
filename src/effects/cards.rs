use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{EventKind, Page, PageEvent, Point, Rect, Subscription, Target};

pub const PROJECT_CARD_SELECTOR: &str = ".project-card";
pub const SKILL_TAG_SELECTOR: &str = ".skill-tag";
pub const CONTACT_CARD_SELECTOR: &str = ".contact-card";
pub const CONTACT_ICON_SELECTOR: &str = ".contact-icon";

pub const TILT_DIVISOR: f64 = 20.0;
pub const CARD_LIFTED: &str = "translateY(-15px) rotateX(5deg)";
pub const CARD_RESTING: &str = "translateY(0) rotateX(0)";
pub const SKILL_PULSE_MS: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// Rotation for a pointer at `client` over a card occupying `rect`.
    /// Not clamped: the card's own size bounds the angles.
    pub fn from_pointer(rect: Rect, client: Point) -> Self {
        let x = client.x - rect.left;
        let y = client.y - rect.top;
        let center_x = rect.width / 2.0;
        let center_y = rect.height / 2.0;

        Self {
            rotate_x: (y - center_y) / TILT_DIVISOR,
            rotate_y: (center_x - x) / TILT_DIVISOR,
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "translateY(-15px) rotateX({}deg) rotateY({}deg)",
            self.rotate_x, self.rotate_y
        )
    }
}

pub fn install_project_tilt<P: Page + 'static>(
    page: &Rc<P>,
    _config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let cards = page.query_selector_all(PROJECT_CARD_SELECTOR);
    let mut subscriptions = Vec::with_capacity(cards.len() * 3);

    for card in cards {
        let on_enter = {
            let page = Rc::clone(page);
            let card = card.clone();
            Box::new(move |_: &mut PageEvent<P::Node>| {
                page.set_style(&card, "transform", CARD_LIFTED)
            })
        };
        let on_leave = {
            let page = Rc::clone(page);
            let card = card.clone();
            Box::new(move |_: &mut PageEvent<P::Node>| {
                page.set_style(&card, "transform", CARD_RESTING)
            })
        };
        let on_move = {
            let page = Rc::clone(page);
            let card = card.clone();
            Box::new(move |event: &mut PageEvent<P::Node>| {
                let tilt = Tilt::from_pointer(page.bounding_rect(&card), event.client);
                page.set_style(&card, "transform", &tilt.transform());
            })
        };

        subscriptions.push(page.listen(
            Target::Element(card.clone()),
            EventKind::MouseEnter,
            on_enter,
        ));
        subscriptions.push(page.listen(
            Target::Element(card.clone()),
            EventKind::MouseLeave,
            on_leave,
        ));
        subscriptions.push(page.listen(Target::Element(card), EventKind::MouseMove, on_move));
    }

    Ok(subscriptions)
}

pub fn install_skill_pulse<P: Page + 'static>(
    page: &Rc<P>,
    _config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let tags = page.query_selector_all(SKILL_TAG_SELECTOR);
    let mut subscriptions = Vec::with_capacity(tags.len());

    for tag in tags {
        let on_click = {
            let page = Rc::clone(page);
            let tag = tag.clone();
            Box::new(move |_: &mut PageEvent<P::Node>| {
                page.set_style(&tag, "transform", "scale(1.1)");
                let settle = {
                    let page = Rc::clone(&page);
                    let tag = tag.clone();
                    Box::new(move || page.set_style(&tag, "transform", "scale(1)"))
                };
                page.set_timeout(SKILL_PULSE_MS, settle).detach();
            })
        };
        subscriptions.push(page.listen(Target::Element(tag), EventKind::Click, on_click));
    }

    Ok(subscriptions)
}

/// Every card must carry an icon; a card without one fails the whole install.
pub fn install_contact_spin<P: Page + 'static>(
    page: &Rc<P>,
    _config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let cards = page.query_selector_all(CONTACT_CARD_SELECTOR);
    let icons = cards
        .iter()
        .map(|card| page.require_within(card, CONTACT_ICON_SELECTOR))
        .collect::<EffectResult<Vec<_>>>()?;

    let mut subscriptions = Vec::with_capacity(cards.len() * 2);
    for (card, icon) in cards.into_iter().zip(icons) {
        let on_enter = {
            let page = Rc::clone(page);
            let icon = icon.clone();
            Box::new(move |_: &mut PageEvent<P::Node>| {
                page.set_style(&icon, "transform", "scale(1.2) rotate(360deg)");
                page.set_style(&icon, "transition", "all 0.5s ease");
            })
        };
        let on_leave = {
            let page = Rc::clone(page);
            Box::new(move |_: &mut PageEvent<P::Node>| {
                page.set_style(&icon, "transform", "scale(1) rotate(0deg)")
            })
        };

        subscriptions.push(page.listen(
            Target::Element(card.clone()),
            EventKind::MouseEnter,
            on_enter,
        ));
        subscriptions.push(page.listen(Target::Element(card), EventKind::MouseLeave, on_leave));
    }

    Ok(subscriptions)
}
