//! [`Page`] backed by the live browser document.

use gloo::events::{EventListener, EventListenerOptions};
use gloo::render::request_animation_frame;
use gloo::timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    window, Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, MouseEvent,
    ScrollBehavior, ScrollToOptions, Window,
};

use crate::error::{EffectError, EffectResult};
use crate::page::{
    Callback, ElementSpec, EventHandler, EventKind, IntersectionEntry, IntersectionHandler,
    ObserverOptions, Page, PageEvent, Rect, Subscription, Target,
};

fn js_error(error: JsValue) -> EffectError {
    EffectError::dom(
        error
            .as_string()
            .unwrap_or_else(|| format!("{error:?}")),
    )
}

struct ObserverGuard {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> EffectResult<Self> {
        let window = window().ok_or(EffectError::NoWindow)?;
        let document = window.document().ok_or(EffectError::NoWindow)?;
        Ok(Self { window, document })
    }

    fn event_target(&self, target: &Target<Element>) -> EventTarget {
        match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Element(element) => element.clone().into(),
        }
    }
}

fn page_event(kind: EventKind, event: &Event) -> PageEvent<Element> {
    let mut page_event = PageEvent::new(kind);
    if let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) {
        page_event = page_event.with_target(target);
    }
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        page_event =
            page_event.with_client(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
    }
    if let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() {
        page_event = page_event.with_key(keyboard.key());
    }
    page_event
}

impl Page for WebPage {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };

        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_within(&self, node: &Element, selector: &str) -> Option<Element> {
        node.query_selector(selector).ok().flatten()
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn contains(&self, ancestor: &Element, target: &Element) -> bool {
        let target: &web_sys::Node = target;
        ancestor.contains(Some(target))
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn toggle_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().toggle(class);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property(property, value);
        }
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn append_element(&self, parent: &Element, spec: ElementSpec<'_>) -> EffectResult<Element> {
        let element = self.document.create_element(spec.tag).map_err(js_error)?;
        if let Some(class) = spec.class {
            element.set_class_name(class);
        }
        if !spec.css_text.is_empty() {
            element.set_attribute("style", spec.css_text).map_err(js_error)?;
        }
        if let Some(text) = spec.text {
            element.set_text_content(Some(text));
        }
        parent.append_child(&element).map_err(js_error)?;
        Ok(element)
    }

    fn remove_element(&self, node: &Element) {
        node.remove();
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.document
            .document_element()
            .map(|root| f64::from(root.client_height()))
            .unwrap_or(0.0)
    }

    fn document_height(&self) -> f64 {
        self.document
            .document_element()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or(0.0)
    }

    fn offset_top(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map(|element| f64::from(element.offset_top()))
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn scroll_to(&self, top: f64, smooth: bool) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false)
    }

    fn listen(
        &self,
        target: Target<Element>,
        kind: EventKind,
        mut handler: EventHandler<Element>,
    ) -> Subscription {
        let event_target = self.event_target(&target);
        let callback = move |event: &Event| {
            let mut page_event = page_event(kind, event);
            handler(&mut page_event);
            if page_event.default_prevented() {
                event.prevent_default();
            }
        };

        let listener = if kind.cancelable() {
            EventListener::new_with_options(
                &event_target,
                kind.as_str(),
                EventListenerOptions::enable_prevent_default(),
                callback,
            )
        } else {
            EventListener::new(&event_target, kind.as_str(), callback)
        };
        Subscription::new(listener)
    }

    fn set_timeout(&self, delay_ms: u32, callback: Callback) -> Subscription {
        Subscription::with_detach(Timeout::new(delay_ms, callback), |timeout: Timeout| {
            timeout.forget();
        })
    }

    fn request_frame(&self, callback: Callback) -> Subscription {
        Subscription::new(request_animation_frame(move |_timestamp| callback()))
    }

    fn observe_intersections(
        &self,
        nodes: &[Element],
        options: ObserverOptions,
        mut handler: IntersectionHandler<Element>,
    ) -> EffectResult<Subscription> {
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let entries: Vec<IntersectionEntry<Element>> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| IntersectionEntry {
                    target: entry.target(),
                    is_intersecting: entry.is_intersecting(),
                })
                .collect();
            handler(&entries);
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(js_error)?;
        for node in nodes {
            observer.observe(node);
        }

        Ok(Subscription::new(ObserverGuard {
            observer,
            _callback: callback,
        }))
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn console_log(&self, message: &str, css: Option<&str>) {
        match css {
            Some(css) => web_sys::console::log_2(&message.into(), &css.into()),
            None => web_sys::console::log_1(&message.into()),
        }
    }
}
