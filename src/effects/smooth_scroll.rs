use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{EventKind, Page, PageEvent, Subscription, Target};

pub const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;

/// Id named by a same-page fragment link, or `None` for a bare `#`.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Scroll position that puts a target just below the fixed header.
pub fn anchor_scroll_top(offset_top: f64, header_offset: f64) -> f64 {
    offset_top - header_offset
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let anchors = page.query_selector_all(ANCHOR_SELECTOR);
    let mut subscriptions = Vec::with_capacity(anchors.len());

    for anchor in anchors {
        let on_click = {
            let page = Rc::clone(page);
            let anchor = anchor.clone();
            let header_offset = config.header_offset_px;
            Box::new(move |event: &mut PageEvent<P::Node>| {
                event.prevent_default();

                let Some(href) = page.attribute(&anchor, "href") else {
                    return;
                };
                let Some(id) = fragment_target(&href) else {
                    return;
                };
                if let Some(section) = page.element_by_id(id) {
                    let top = anchor_scroll_top(page.offset_top(&section), header_offset);
                    page.scroll_to(top, true);
                }
            })
        };
        subscriptions.push(page.listen(Target::Element(anchor), EventKind::Click, on_click));
    }

    Ok(subscriptions)
}
