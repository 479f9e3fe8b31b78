use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{EventKind, Page, PageEvent, Subscription, Target};
use crate::throttle::Throttle;

pub const FOG_LAYER_SELECTOR: &str = ".fog-layer";
pub const PARALLAX_SPEED_STEP: f64 = 0.3;

/// Vertical offset of zero-indexed layer `index` at the given scroll position.
pub fn layer_offset(scroll_y: f64, index: usize) -> f64 {
    scroll_y * (index as f64 + 1.0) * PARALLAX_SPEED_STEP
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let layers = page.query_selector_all(FOG_LAYER_SELECTOR);
    if layers.is_empty() {
        return Ok(Vec::new());
    }

    let on_scroll = {
        let page = Rc::clone(page);
        let throttle = Throttle::new(config.scroll_throttle_ms);
        Box::new(move |_: &mut PageEvent<P::Node>| {
            if !throttle.ready(page.now_ms()) {
                return;
            }
            let scroll_y = page.scroll_y();
            for (index, layer) in layers.iter().enumerate() {
                let offset = layer_offset(scroll_y, index);
                page.set_style(layer, "transform", &format!("translateY({offset}px)"));
            }
        })
    };

    Ok(vec![page.listen(Target::Window, EventKind::Scroll, on_scroll)])
}
