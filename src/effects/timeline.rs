use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{IntersectionEntry, ObserverOptions, Page, Subscription};

pub const TIMELINE_ITEM_SELECTOR: &str = ".timeline-item";
pub const TIMELINE_THRESHOLD: f64 = 0.3;
pub const TIMELINE_STAGGER_MS: u32 = 150;

/// Delay for each entry of one intersection batch. Only intersecting entries
/// take a slot, in the order the observer reported them.
pub fn batch_delays<N>(entries: &[IntersectionEntry<N>]) -> Vec<Option<u32>> {
    let mut slot: u32 = 0;
    entries
        .iter()
        .map(|entry| {
            if !entry.is_intersecting {
                return None;
            }
            let delay = slot.saturating_mul(TIMELINE_STAGGER_MS);
            slot += 1;
            Some(delay)
        })
        .collect()
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    _config: &EffectsConfig,
) -> EffectResult<Vec<Subscription>> {
    let items = page.query_selector_all(TIMELINE_ITEM_SELECTOR);
    if items.is_empty() {
        return Ok(Vec::new());
    }

    for item in &items {
        page.set_style(item, "opacity", "0");
        page.set_style(item, "transform", "translateX(-30px)");
        page.set_style(item, "transition", "all 0.6s ease");
    }

    let on_intersect = {
        let page = Rc::clone(page);
        Box::new(move |entries: &[IntersectionEntry<P::Node>]| {
            for (entry, delay) in entries.iter().zip(batch_delays(entries)) {
                let Some(delay) = delay else {
                    continue;
                };
                let show = {
                    let page = Rc::clone(&page);
                    let item = entry.target.clone();
                    Box::new(move || {
                        page.set_style(&item, "opacity", "1");
                        page.set_style(&item, "transform", "translateX(0)");
                    })
                };
                page.set_timeout(delay, show).detach();
            }
        })
    };

    let observer = page.observe_intersections(
        &items,
        ObserverOptions::new(TIMELINE_THRESHOLD, "0px"),
        on_intersect,
    )?;
    Ok(vec![observer])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    fn entry(target: usize, is_intersecting: bool) -> IntersectionEntry<usize> {
        IntersectionEntry {
            target,
            is_intersecting,
        }
    }

    #[test]
    fn stagger_skips_non_intersecting_entries() {
        let delays = batch_delays(&[
            entry(1, true),
            entry(2, false),
            entry(3, true),
            entry(4, true),
        ]);
        assert_eq!(delays, vec![Some(0), None, Some(150), Some(300)]);
    }

    #[test]
    fn items_start_hidden_and_slide_in_staggered() {
        let page = Rc::new(FakePage::new());
        let items: Vec<_> = (0..3)
            .map(|_| page.add(page.body_id(), "div", None, &["timeline-item"]))
            .collect();
        let _subscriptions = install(&page, &EffectsConfig::default()).expect("install");

        assert_eq!(page.observer_options()[0].threshold, 0.3);
        for item in &items {
            assert_eq!(page.style(*item, "opacity").as_deref(), Some("0"));
            assert_eq!(page.style(*item, "transform").as_deref(), Some("translateX(-30px)"));
        }

        page.intersect(&[(items[0], true), (items[1], true)]);
        page.advance(0);
        assert_eq!(page.style(items[0], "opacity").as_deref(), Some("1"));
        assert_eq!(page.style(items[1], "opacity").as_deref(), Some("0"));

        page.advance(150);
        assert_eq!(page.style(items[1], "opacity").as_deref(), Some("1"));
        assert_eq!(page.style(items[1], "transform").as_deref(), Some("translateX(0)"));
        assert_eq!(page.style(items[2], "opacity").as_deref(), Some("0"));
    }

    #[test]
    fn leaving_viewport_does_not_hide_again() {
        let page = Rc::new(FakePage::new());
        let item = page.add(page.body_id(), "div", None, &["timeline-item"]);
        let _subscriptions = install(&page, &EffectsConfig::default()).expect("install");

        page.intersect(&[(item, true)]);
        page.advance(0);
        page.intersect(&[(item, false)]);
        page.advance(1_000);
        assert_eq!(page.style(item, "opacity").as_deref(), Some("1"));
    }
}
