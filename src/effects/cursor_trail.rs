use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::EffectsConfig;
use crate::error::EffectResult;
use crate::page::{
    ElementSpec, EventKind, Page, PageEvent, Point, Subscription, SubscriptionSlot, Target,
};

pub const MARKER_SELECTOR: &str = ".circle";
pub const MARKER_CLASS: &str = "circle";
pub const MARKER_RADIUS_PX: f64 = 4.0;
pub const TRAIL_EASING: f64 = 0.3;
const MARKER_CSS: &str = "position: fixed; width: 8px; height: 8px; border-radius: 50%; \
     background: rgba(139, 30, 30, 0.3); pointer-events: none; z-index: 9999; \
     transition: all 0.1s ease;";

#[derive(Clone, Debug, PartialEq)]
pub struct TrailState {
    markers: Vec<Point>,
}

impl TrailState {
    pub fn new(count: usize) -> Self {
        Self {
            markers: vec![Point::default(); count],
        }
    }

    pub fn markers(&self) -> &[Point] {
        &self.markers
    }

    // Each follower eases from the marker ahead of it back toward its own
    // previous position.
    pub fn step(&mut self, cursor: Point) {
        let mut position = cursor;
        for index in 0..self.markers.len() {
            self.markers[index] = position;
            if let Some(next) = self.markers.get(index + 1).copied() {
                position = position.ease_toward(next, TRAIL_EASING);
            }
        }
    }
}

pub fn marker_scale(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 1.0;
    }
    count.saturating_sub(index) as f64 / count as f64
}

pub fn trail_enabled<P: Page + ?Sized>(page: &P, config: &EffectsConfig) -> bool {
    if page.viewport_width() < config.trail_breakpoint_px {
        return false;
    }
    !(config.respect_reduced_motion && page.prefers_reduced_motion())
}

pub struct CursorTrail {
    running: Rc<Cell<bool>>,
    pending_frame: SubscriptionSlot,
    _pointer: Subscription,
}

impl CursorTrail {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        self.running.set(false);
        self.pending_frame.clear();
    }
}

impl Drop for CursorTrail {
    fn drop(&mut self) {
        self.stop();
    }
}

struct TrailLoop<P: Page> {
    page: Rc<P>,
    markers: Vec<P::Node>,
    state: RefCell<TrailState>,
    cursor: Rc<Cell<Point>>,
    running: Rc<Cell<bool>>,
    pending_frame: SubscriptionSlot,
}

impl<P: Page + 'static> TrailLoop<P> {
    fn schedule(self: Rc<Self>) {
        let trail = Rc::clone(&self);
        let frame = self.page.request_frame(Box::new(move || {
            if !trail.running.get() {
                return;
            }
            trail.render();
            trail.schedule();
        }));
        self.pending_frame.replace(frame);
    }

    fn render(&self) {
        let mut state = self.state.borrow_mut();
        state.step(self.cursor.get());

        let count = self.markers.len();
        for (index, (marker, position)) in self.markers.iter().zip(state.markers()).enumerate() {
            self.page.set_style(marker, "left", &format!("{}px", position.x - MARKER_RADIUS_PX));
            self.page.set_style(marker, "top", &format!("{}px", position.y - MARKER_RADIUS_PX));
            self.page.set_style(
                marker,
                "transform",
                &format!("scale({})", marker_scale(index, count)),
            );
        }
    }
}

pub fn install<P: Page + 'static>(
    page: &Rc<P>,
    config: &EffectsConfig,
) -> EffectResult<Option<CursorTrail>> {
    if !trail_enabled(&**page, config) {
        return Ok(None);
    }

    let mut markers = page.query_selector_all(MARKER_SELECTOR);
    if markers.is_empty() {
        let body = page.require_body()?;
        for _ in 0..config.trail_markers {
            markers.push(page.append_element(
                &body,
                ElementSpec::new("div").class(MARKER_CLASS).css(MARKER_CSS),
            )?);
        }
    }

    let cursor = Rc::new(Cell::new(Point::default()));
    let on_pointer = {
        let cursor = Rc::clone(&cursor);
        Box::new(move |event: &mut PageEvent<P::Node>| cursor.set(event.client))
    };
    let pointer = page.listen(Target::Window, EventKind::MouseMove, on_pointer);

    let running = Rc::new(Cell::new(true));
    let pending_frame = SubscriptionSlot::new();
    let trail_loop = Rc::new(TrailLoop {
        page: Rc::clone(page),
        state: RefCell::new(TrailState::new(markers.len())),
        markers,
        cursor,
        running: Rc::clone(&running),
        pending_frame: pending_frame.clone(),
    });
    trail_loop.render();
    trail_loop.schedule();

    Ok(Some(CursorTrail {
        running,
        pending_frame,
        _pointer: pointer,
    }))
}
