use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{EventKind, Page, PageEvent, Subscription, Target};
use crate::throttle::Throttle;

pub const NAVBAR_ID: &str = "navbar";
pub const NAV_TOGGLE_ID: &str = "nav-toggle";
pub const NAV_MENU_ID: &str = "nav-menu";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const ACTIVE_CLASS: &str = "active";

/// Binary switch with no hysteresis band.
pub fn navbar_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y >= threshold
}

fn close_menu<P: Page>(page: &P, toggle: &P::Node, menu: &P::Node) {
    page.remove_class(toggle, ACTIVE_CLASS);
    page.remove_class(menu, ACTIVE_CLASS);
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let navbar = page.require_id(NAVBAR_ID)?;
    let toggle = page.require_id(NAV_TOGGLE_ID)?;
    let menu = page.require_id(NAV_MENU_ID)?;
    let links = page.query_selector_all(NAV_LINK_SELECTOR);

    let mut subscriptions = Vec::with_capacity(links.len() + 3);

    let on_scroll = {
        let page = Rc::clone(page);
        let threshold = config.navbar_threshold_px;
        let throttle = Throttle::new(config.scroll_throttle_ms);
        Box::new(move |_: &mut PageEvent<P::Node>| {
            if !throttle.ready(page.now_ms()) {
                return;
            }
            if navbar_scrolled(page.scroll_y(), threshold) {
                page.add_class(&navbar, SCROLLED_CLASS);
            } else {
                page.remove_class(&navbar, SCROLLED_CLASS);
            }
        })
    };
    subscriptions.push(page.listen(Target::Window, EventKind::Scroll, on_scroll));

    let on_toggle = {
        let page = Rc::clone(page);
        let toggle = toggle.clone();
        let menu = menu.clone();
        Box::new(move |_: &mut PageEvent<P::Node>| {
            page.toggle_class(&toggle, ACTIVE_CLASS);
            page.toggle_class(&menu, ACTIVE_CLASS);
        })
    };
    subscriptions.push(page.listen(
        Target::Element(toggle.clone()),
        EventKind::Click,
        on_toggle,
    ));

    for link in links {
        let on_link = {
            let page = Rc::clone(page);
            let toggle = toggle.clone();
            let menu = menu.clone();
            Box::new(move |_: &mut PageEvent<P::Node>| close_menu(&*page, &toggle, &menu))
        };
        subscriptions.push(page.listen(Target::Element(link), EventKind::Click, on_link));
    }

    let on_outside_click = {
        let page = Rc::clone(page);
        Box::new(move |event: &mut PageEvent<P::Node>| {
            let inside = event
                .target
                .as_ref()
                .is_some_and(|target| {
                    page.contains(&menu, target) || page.contains(&toggle, target)
                });
            if !inside {
                close_menu(&*page, &toggle, &menu);
            }
        })
    };
    subscriptions.push(page.listen(Target::Document, EventKind::Click, on_outside_click));

    Ok(subscriptions)
}
