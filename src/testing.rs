//! In-memory [`Page`] for host-side tests: a flat element arena, a virtual
//! clock for timers, a manual frame queue and a manual intersection driver.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{EffectError, EffectResult};
use crate::page::{
    Callback, ElementSpec, EventHandler, EventKind, IntersectionEntry, IntersectionHandler,
    ObserverOptions, Page, PageEvent, Point, Rect, Subscription, Target,
};

pub type NodeId = usize;

const HEAD: NodeId = 0;
const BODY: NodeId = 1;

#[derive(Default)]
struct FakeElement {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    css_text: String,
    text: String,
    parent: Option<NodeId>,
    offset_top: f64,
    rect: Rect,
    removed: bool,
}

struct AliveGuard(Rc<Cell<bool>>);

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn alive_pair() -> (Rc<Cell<bool>>, Subscription) {
    let alive = Rc::new(Cell::new(true));
    let subscription = Subscription::new(AliveGuard(alive.clone()));
    (alive, subscription)
}

struct Listener {
    target: Target<NodeId>,
    kind: EventKind,
    handler: Rc<RefCell<EventHandler<NodeId>>>,
    alive: Rc<Cell<bool>>,
}

struct Timer {
    due: u64,
    seq: u64,
    callback: Callback,
    alive: Rc<Cell<bool>>,
}

struct Frame {
    callback: Callback,
    alive: Rc<Cell<bool>>,
}

struct Observer {
    nodes: Vec<NodeId>,
    options: ObserverOptions,
    handler: Rc<RefCell<IntersectionHandler<NodeId>>>,
    alive: Rc<Cell<bool>>,
}

pub struct FakePage {
    elements: RefCell<Vec<FakeElement>>,
    listeners: RefCell<Vec<Listener>>,
    timers: RefCell<Vec<Timer>>,
    frames: RefCell<Vec<Frame>>,
    observers: RefCell<Vec<Observer>>,
    console: RefCell<Vec<String>>,
    scroll_requests: RefCell<Vec<(f64, bool)>>,
    now: Cell<u64>,
    seq: Cell<u64>,
    scroll_y: Cell<f64>,
    viewport: Cell<(f64, f64)>,
    document_height: Cell<f64>,
    reduced_motion: Cell<bool>,
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePage {
    pub fn new() -> Self {
        let head = FakeElement {
            tag: "head".to_string(),
            ..FakeElement::default()
        };
        let body = FakeElement {
            tag: "body".to_string(),
            ..FakeElement::default()
        };

        Self {
            elements: RefCell::new(vec![head, body]),
            listeners: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            console: RefCell::new(Vec::new()),
            scroll_requests: RefCell::new(Vec::new()),
            now: Cell::new(0),
            seq: Cell::new(0),
            scroll_y: Cell::new(0.0),
            viewport: Cell::new((1_280.0, 720.0)),
            document_height: Cell::new(3_000.0),
            reduced_motion: Cell::new(false),
        }
    }

    pub fn body_id(&self) -> NodeId {
        BODY
    }

    pub fn head_id(&self) -> NodeId {
        HEAD
    }

    pub fn add(&self, parent: NodeId, tag: &str, id: Option<&str>, classes: &[&str]) -> NodeId {
        let mut elements = self.elements.borrow_mut();
        elements.push(FakeElement {
            tag: tag.to_string(),
            id: id.map(str::to_string),
            classes: classes.iter().map(|class| class.to_string()).collect(),
            parent: Some(parent),
            ..FakeElement::default()
        });
        elements.len() - 1
    }

    pub fn set_attr(&self, node: NodeId, name: &str, value: &str) {
        self.elements.borrow_mut()[node]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        self.elements.borrow_mut()[node].text = text.to_string();
    }

    pub fn set_offset_top(&self, node: NodeId, offset_top: f64) {
        self.elements.borrow_mut()[node].offset_top = offset_top;
    }

    pub fn set_rect(&self, node: NodeId, rect: Rect) {
        self.elements.borrow_mut()[node].rect = rect;
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.viewport.set((width, height));
    }

    pub fn set_document_height(&self, height: f64) {
        self.document_height.set(height);
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(reduced);
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.elements.borrow()[node].styles.get(property).cloned()
    }

    pub fn css_text(&self, node: NodeId) -> String {
        self.elements.borrow()[node].css_text.clone()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.elements.borrow()[node].text.clone()
    }

    pub fn is_removed(&self, node: NodeId) -> bool {
        self.elements.borrow()[node].removed
    }

    pub fn has(&self, node: NodeId, class: &str) -> bool {
        self.elements.borrow()[node].classes.iter().any(|c| c == class)
    }

    /// Live children of `parent` with the given tag, in creation order.
    pub fn children_with_tag(&self, parent: NodeId, tag: &str) -> Vec<NodeId> {
        self.elements
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, element)| {
                !element.removed && element.parent == Some(parent) && element.tag == tag
            })
            .map(|(index, _)| index)
            .collect()
    }

    pub fn console_lines(&self) -> Vec<String> {
        self.console.borrow().clone()
    }

    pub fn scroll_requests(&self) -> Vec<(f64, bool)> {
        self.scroll_requests.borrow().clone()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().iter().filter(|timer| timer.alive.get()).count()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().iter().filter(|frame| frame.alive.get()).count()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|listener| listener.alive.get())
            .count()
    }

    pub fn observer_options(&self) -> Vec<ObserverOptions> {
        self.observers
            .borrow()
            .iter()
            .filter(|observer| observer.alive.get())
            .map(|observer| observer.options.clone())
            .collect()
    }

    /// Moves the virtual clock forward, firing due timers in order.
    pub fn advance(&self, ms: u64) {
        let end = self.now.get() + ms;

        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                timers.retain(|timer| timer.alive.get());
                let index = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= end)
                    .min_by_key(|(_, timer)| (timer.due, timer.seq))
                    .map(|(index, _)| index);
                index.map(|index| timers.remove(index))
            };

            let Some(timer) = next else {
                break;
            };

            self.now.set(timer.due.max(self.now.get()));
            (timer.callback)();
        }

        self.now.set(end);
    }

    pub fn run_frame(&self) {
        let frames: Vec<Frame> = self.frames.borrow_mut().drain(..).collect();
        for frame in frames {
            if frame.alive.get() {
                (frame.callback)();
            }
        }
    }

    pub fn run_frames(&self, count: usize) {
        for _ in 0..count {
            self.run_frame();
        }
    }

    pub fn scroll_window(&self, y: f64) {
        self.scroll_y.set(y);
        self.dispatch(&[Target::Window], PageEvent::new(EventKind::Scroll));
    }

    /// Clicks `node`, bubbling through its ancestors, the document and the
    /// window. Returns whether a handler prevented the default action.
    pub fn click(&self, node: NodeId) -> bool {
        let mut targets: Vec<Target<NodeId>> =
            self.ancestry(node).into_iter().map(Target::Element).collect();
        targets.push(Target::Document);
        targets.push(Target::Window);
        self.dispatch(&targets, PageEvent::new(EventKind::Click).with_target(node))
    }

    pub fn mouse_move(&self, node: Option<NodeId>, x: f64, y: f64) {
        let mut targets = Vec::new();
        let mut event = PageEvent::new(EventKind::MouseMove).with_client(x, y);
        if let Some(node) = node {
            targets.extend(self.ancestry(node).into_iter().map(Target::Element));
            event = event.with_target(node);
        }
        targets.push(Target::Document);
        targets.push(Target::Window);
        self.dispatch(&targets, event);
    }

    pub fn mouse_enter(&self, node: NodeId) {
        self.dispatch(
            &[Target::Element(node)],
            PageEvent::new(EventKind::MouseEnter).with_target(node),
        );
    }

    pub fn mouse_leave(&self, node: NodeId) {
        self.dispatch(
            &[Target::Element(node)],
            PageEvent::new(EventKind::MouseLeave).with_target(node),
        );
    }

    pub fn key_down(&self, key: &str) {
        self.dispatch(
            &[Target::Document, Target::Window],
            PageEvent::new(EventKind::KeyDown).with_key(key),
        );
    }

    pub fn intersect(&self, entries: &[(NodeId, bool)]) {
        let observers: Vec<(Vec<NodeId>, Rc<RefCell<IntersectionHandler<NodeId>>>)> = self
            .observers
            .borrow()
            .iter()
            .filter(|observer| observer.alive.get())
            .map(|observer| (observer.nodes.clone(), observer.handler.clone()))
            .collect();

        for (nodes, handler) in observers {
            let batch: Vec<IntersectionEntry<NodeId>> = entries
                .iter()
                .filter(|(node, _)| nodes.contains(node))
                .map(|&(target, is_intersecting)| IntersectionEntry {
                    target,
                    is_intersecting,
                })
                .collect();

            if !batch.is_empty() {
                let mut handler = handler.borrow_mut();
                (*handler)(&batch);
            }
        }
    }

    fn dispatch(&self, targets: &[Target<NodeId>], mut event: PageEvent<NodeId>) -> bool {
        let handlers: Vec<Rc<RefCell<EventHandler<NodeId>>>> = targets
            .iter()
            .flat_map(|target| {
                self.listeners
                    .borrow()
                    .iter()
                    .filter(|listener| {
                        listener.alive.get()
                            && listener.kind == event.kind
                            && &listener.target == target
                    })
                    .map(|listener| listener.handler.clone())
                    .collect::<Vec<_>>()
            })
            .collect();

        for handler in handlers {
            let mut handler = handler.borrow_mut();
            (*handler)(&mut event);
        }

        event.default_prevented()
    }

    fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let elements = self.elements.borrow();
        let mut chain = vec![node];
        let mut current = elements[node].parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = elements[parent].parent;
        }
        chain
    }

    fn matches(element: &FakeElement, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            return element.id.as_deref() == Some(id);
        }
        if let Some(class) = selector.strip_prefix('.') {
            return element.classes.iter().any(|c| c == class);
        }
        if let Some(tag) = selector.strip_suffix(r##"[href^="#"]"##) {
            return element.tag == tag
                && element
                    .attributes
                    .get("href")
                    .is_some_and(|href| href.starts_with('#'));
        }
        element.tag == selector
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        node != ancestor && self.ancestry(node).contains(&ancestor)
    }
}

impl Page for FakePage {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .borrow()
            .iter()
            .position(|element| !element.removed && element.id.as_deref() == Some(id))
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.elements
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, element)| !element.removed && Self::matches(element, selector))
            .map(|(index, _)| index)
            .collect()
    }

    fn query_within(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector)
            .into_iter()
            .find(|candidate| self.is_descendant(*candidate, *node))
    }

    fn head(&self) -> Option<NodeId> {
        Some(HEAD)
    }

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.elements.borrow()[*node].attributes.get(name).cloned()
    }

    fn contains(&self, ancestor: &NodeId, target: &NodeId) -> bool {
        self.ancestry(*target).contains(ancestor)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut elements = self.elements.borrow_mut();
        let classes = &mut elements[*node].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.elements.borrow_mut()[*node].classes.retain(|c| c != class);
    }

    fn toggle_class(&self, node: &NodeId, class: &str) {
        if self.has_class(node, class) {
            self.remove_class(node, class);
        } else {
            self.add_class(node, class);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.has(*node, class)
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.elements.borrow_mut()[*node]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.text(*node)
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        self.set_text(*node, text);
    }

    fn append_element(&self, parent: &NodeId, spec: ElementSpec<'_>) -> EffectResult<NodeId> {
        if self.is_removed(*parent) {
            return Err(EffectError::dom("parent detached"));
        }

        let classes: Vec<&str> = spec.class.into_iter().collect();
        let node = self.add(*parent, spec.tag, None, &classes);
        {
            let mut elements = self.elements.borrow_mut();
            elements[node].css_text = spec.css_text.to_string();
            if let Some(text) = spec.text {
                elements[node].text = text.to_string();
            }
        }
        Ok(node)
    }

    fn remove_element(&self, node: &NodeId) {
        self.elements.borrow_mut()[*node].removed = true;
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn viewport_width(&self) -> f64 {
        self.viewport.get().0
    }

    fn viewport_height(&self) -> f64 {
        self.viewport.get().1
    }

    fn document_height(&self) -> f64 {
        self.document_height.get()
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.elements.borrow()[*node].offset_top
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.elements.borrow()[*node].rect
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        self.scroll_requests.borrow_mut().push((top, smooth));
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    fn listen(
        &self,
        target: Target<NodeId>,
        kind: EventKind,
        handler: EventHandler<NodeId>,
    ) -> Subscription {
        let (alive, subscription) = alive_pair();
        self.listeners.borrow_mut().push(Listener {
            target,
            kind,
            handler: Rc::new(RefCell::new(handler)),
            alive,
        });
        subscription
    }

    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> Subscription {
        let (alive, subscription) = alive_pair();
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + u64::from(delay_ms),
            seq,
            callback,
            alive,
        });
        subscription
    }

    fn request_frame(&self, callback: Callback) -> Subscription {
        let (alive, subscription) = alive_pair();
        self.frames.borrow_mut().push(Frame { callback, alive });
        subscription
    }

    fn observe_intersections(
        &self,
        nodes: &[NodeId],
        options: ObserverOptions,
        handler: IntersectionHandler<NodeId>,
    ) -> EffectResult<Subscription> {
        let (alive, subscription) = alive_pair();
        self.observers.borrow_mut().push(Observer {
            nodes: nodes.to_vec(),
            options,
            handler: Rc::new(RefCell::new(handler)),
            alive,
        });
        Ok(subscription)
    }

    fn now_ms(&self) -> f64 {
        self.now.get() as f64
    }

    fn console_log(&self, message: &str, _css: Option<&str>) {
        self.console.borrow_mut().push(message.to_string());
    }
}

/// Parses a CSS length like `"42.5px"` or `"30%"`.
pub fn css_number(value: &str) -> f64 {
    value
        .trim_end_matches("px")
        .trim_end_matches('%')
        .parse()
        .unwrap_or_else(|_| panic!("not a CSS number: {value}"))
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}
