use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{ElementSpec, EventKind, Page, PageEvent, Subscription, Target};
use crate::throttle::Throttle;

const PROGRESS_BAR_CSS: &str = "position: fixed; top: 0; left: 0; width: 0%; height: 3px; \
     background: linear-gradient(to right, #8b1e1e, #9d7e5f); z-index: 10001; \
     transition: width 0.1s ease;";

/// Percentage of the scrollable distance covered, in `0..=100`.
///
/// A document no taller than the viewport has nothing to scroll and reports 0.
pub fn scroll_progress(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let body = page.require_body()?;
    let bar = page.append_element(&body, ElementSpec::new("div").css(PROGRESS_BAR_CSS))?;

    let on_scroll = {
        let page = Rc::clone(page);
        let throttle = Throttle::new(config.scroll_throttle_ms);
        Box::new(move |_: &mut PageEvent<P::Node>| {
            if !throttle.ready(page.now_ms()) {
                return;
            }
            let progress =
                scroll_progress(page.scroll_y(), page.document_height(), page.viewport_height());
            page.set_style(&bar, "width", &format!("{progress}%"));
        })
    };

    Ok(vec![page.listen(Target::Window, EventKind::Scroll, on_scroll)])
}
