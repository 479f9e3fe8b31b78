//! Capability interface over the browser window and document.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{EffectError, EffectResult};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn ease_toward(self, other: Point, factor: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * factor,
            y: self.y + (other.y - self.y) * factor,
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scroll,
    Click,
    MouseMove,
    MouseEnter,
    MouseLeave,
    KeyDown,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Click => "click",
            Self::MouseMove => "mousemove",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::KeyDown => "keydown",
        }
    }

    /// Whether handlers of this kind may cancel the browser default.
    pub fn cancelable(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Target<N> {
    Window,
    Document,
    Element(N),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageEvent<N> {
    pub kind: EventKind,
    pub target: Option<N>,
    pub client: Point,
    pub key: Option<String>,
    default_prevented: bool,
}

impl<N> PageEvent<N> {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            client: Point::default(),
            key: None,
            default_prevented: false,
        }
    }

    pub fn with_target(mut self, target: N) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_client(mut self, x: f64, y: f64) -> Self {
        self.client = Point::new(x, y);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn new(threshold: f64, root_margin: impl Into<String>) -> Self {
        Self {
            threshold,
            root_margin: root_margin.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ElementSpec<'a> {
    pub tag: &'a str,
    pub class: Option<&'a str>,
    pub css_text: &'a str,
    pub text: Option<&'a str>,
}

impl<'a> ElementSpec<'a> {
    pub fn new(tag: &'a str) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn css(mut self, css_text: &'a str) -> Self {
        self.css_text = css_text;
        self
    }

    pub fn text(mut self, text: &'a str) -> Self {
        self.text = Some(text);
        self
    }
}

type DetachHook = Box<dyn FnOnce(Box<dyn Any>)>;

/// Dropping it cancels the registration; [`Subscription::detach`] keeps it alive.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    inner: Option<Box<dyn Any>>,
    on_detach: Option<DetachHook>,
}

impl Subscription {
    pub fn new<T: 'static>(inner: T) -> Self {
        Self {
            inner: Some(Box::new(inner)),
            on_detach: None,
        }
    }

    /// Like [`Subscription::new`], but `release` takes over the registration
    /// on detach instead of it being leaked whole.
    pub fn with_detach<T: 'static>(inner: T, release: fn(T)) -> Self {
        let on_detach: DetachHook = Box::new(move |inner: Box<dyn Any>| {
            if let Ok(inner) = inner.downcast::<T>() {
                release(*inner);
            }
        });
        Self {
            inner: Some(Box::new(inner)),
            on_detach: Some(on_detach),
        }
    }

    pub fn detach(self) {
        let Some(inner) = self.inner else {
            return;
        };
        match self.on_detach {
            Some(release) => release(inner),
            None => std::mem::forget(inner),
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.inner.is_some())
            .finish()
    }
}

// Pending step of a self-rescheduling timer or frame chain.
#[derive(Clone, Default)]
pub struct SubscriptionSlot(Rc<RefCell<Option<Subscription>>>);

impl SubscriptionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, subscription: Subscription) {
        let previous = self.0.borrow_mut().replace(subscription);
        drop(previous);
    }

    pub fn clear(&self) {
        let previous = self.0.borrow_mut().take();
        drop(previous);
    }

    pub fn is_occupied(&self) -> bool {
        self.0.borrow().is_some()
    }

    pub fn guard(&self) -> Subscription {
        Subscription::new(SlotGuard(self.clone()))
    }
}

struct SlotGuard(SubscriptionSlot);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.clear();
    }
}

pub type EventHandler<N> = Box<dyn FnMut(&mut PageEvent<N>)>;
pub type IntersectionHandler<N> = Box<dyn FnMut(&[IntersectionEntry<N>])>;
pub type Callback = Box<dyn FnOnce()>;

pub trait Page {
    type Node: Clone + PartialEq + 'static;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_within(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn head(&self) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn contains(&self, ancestor: &Self::Node, target: &Self::Node) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn toggle_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn text_content(&self, node: &Self::Node) -> String;
    fn set_text_content(&self, node: &Self::Node, text: &str);
    fn append_element(
        &self,
        parent: &Self::Node,
        spec: ElementSpec<'_>,
    ) -> EffectResult<Self::Node>;
    fn remove_element(&self, node: &Self::Node);

    fn scroll_y(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn document_height(&self) -> f64;
    fn offset_top(&self, node: &Self::Node) -> f64;
    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    fn scroll_to(&self, top: f64, smooth: bool);
    fn prefers_reduced_motion(&self) -> bool;

    fn listen(
        &self,
        target: Target<Self::Node>,
        kind: EventKind,
        handler: EventHandler<Self::Node>,
    ) -> Subscription;
    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> Subscription;
    fn request_frame(&self, callback: Callback) -> Subscription;
    fn observe_intersections(
        &self,
        nodes: &[Self::Node],
        options: ObserverOptions,
        handler: IntersectionHandler<Self::Node>,
    ) -> EffectResult<Subscription>;

    fn now_ms(&self) -> f64;
    fn console_log(&self, message: &str, css: Option<&str>);

    fn require_id(&self, id: &str) -> EffectResult<Self::Node> {
        self.element_by_id(id)
            .ok_or_else(|| EffectError::element_not_found(format!("#{id}")))
    }

    fn require(&self, selector: &str) -> EffectResult<Self::Node> {
        self.query_selector(selector)
            .ok_or_else(|| EffectError::element_not_found(selector))
    }

    fn require_within(&self, node: &Self::Node, selector: &str) -> EffectResult<Self::Node> {
        self.query_within(node, selector)
            .ok_or_else(|| EffectError::element_not_found(selector))
    }

    fn require_body(&self) -> EffectResult<Self::Node> {
        self.body()
            .ok_or_else(|| EffectError::element_not_found("body"))
    }
}
