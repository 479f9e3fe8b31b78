use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{Page, Subscription};

pub const LOADING_SCREEN_ID: &str = "loading-screen";

/// Hides the splash overlay once the configured delay has elapsed.
pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let loading_screen = page.require_id(LOADING_SCREEN_ID)?;

    let hide = {
        let page = Rc::clone(page);
        Box::new(move || page.set_style(&loading_screen, "display", "none"))
    };

    Ok(vec![page.set_timeout(config.loading_delay_ms, hide)])
}
