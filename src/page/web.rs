//! Browser host: a web-sys [`Dom`], listener wiring and timer driving.
//!
//! Only compiled on `wasm32` targets.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent};

use super::controller::{GalleryController, PageEvent};
use super::controls::{KeyPress, RangeControl};
use super::dom::{Dom, Size};
use super::timer::Clock;
use crate::config::ControllerConfig;

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn to_js(err: crate::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

fn html(node: &Element) -> Option<&HtmlElement> {
    node.dyn_ref::<HtmlElement>()
}

impl Dom for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length()).filter_map(|i| children.item(i)).collect()
    }

    fn id(&self, node: &Element) -> String {
        node.id()
    }

    fn elements_from_point(&self, x: f64, y: f64) -> Vec<Element> {
        self.document
            .elements_from_point(x as f32, y as f32)
            .iter()
            .filter_map(|value| value.dyn_into::<Element>().ok())
            .collect()
    }

    fn viewport(&self) -> Size {
        let root = self.document.document_element();
        let body = self.document.body();
        let pick = |f: fn(&Element) -> i32| {
            root.as_ref()
                .map(f)
                .filter(|&v| v != 0)
                .or_else(|| body.as_ref().map(|b| f(b)))
                .unwrap_or(0)
        };
        Size::new(f64::from(pick(Element::client_width)), f64::from(pick(Element::client_height)))
    }

    fn offset_size(&self, node: &Element) -> Size {
        html(node)
            .map(|e| Size::new(f64::from(e.offset_width()), f64::from(e.offset_height())))
            .unwrap_or_default()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn style(&self, node: &Element, property: &str) -> String {
        html(node)
            .and_then(|e| e.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &Element, property: &str, value: Option<&str>) {
        let Some(e) = html(node) else { return };
        let style = e.style();
        let _ = match value {
            Some(v) => style.set_property(property, v),
            None => style.remove_property(property).map(|_| ()),
        };
    }

    fn data(&self, node: &Element, key: &str) -> Option<String> {
        html(node).and_then(|e| e.dataset().get(key))
    }

    fn value(&self, node: &Element) -> String {
        node.dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }
}

/// `performance.now()`, falling back to `Date.now()`.
pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

type Shared = Rc<RefCell<GalleryController<WebDom, PerformanceClock>>>;

/// Feeds events into the controller and keeps one `setTimeout` armed for its
/// earliest deferred action.
#[derive(Clone)]
struct Driver {
    controller: Shared,
    /// Armed timeout handle and the deadline it was armed for.
    armed: Rc<Cell<Option<(i32, f64)>>>,
}

impl Driver {
    fn dispatch(&self, event: PageEvent) {
        let result = self.controller.borrow_mut().handle(event);
        if let Err(e) = result {
            tracing::error!("event handler aborted: {e}");
            console_error(&format!("galaxy-gallery: {e}"));
        }
        self.arm();
    }

    fn fire(&self) {
        self.armed.set(None);
        let result = self.controller.borrow_mut().advance();
        if let Err(e) = result {
            tracing::error!("deferred action failed: {e}");
            console_error(&format!("galaxy-gallery: {e}"));
        }
        self.arm();
    }

    fn arm(&self) {
        let (deadline, now) = {
            let controller = self.controller.borrow();
            match controller.next_deadline() {
                Some(deadline) => (deadline, controller.now_ms()),
                None => return,
            }
        };
        if let Some((_, armed_for)) = self.armed.get() {
            if armed_for <= deadline {
                return;
            }
        }
        let Some(window) = web_sys::window() else { return };
        if let Some((handle, _)) = self.armed.take() {
            window.clear_timeout_with_handle(handle);
        }

        let delay = (deadline - now).max(0.0).ceil() as i32;
        let driver = self.clone();
        let callback = Closure::once_into_js(move || driver.fire());
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay) {
            Ok(handle) => self.armed.set(Some((handle, deadline))),
            Err(_) => console_error("galaxy-gallery: setTimeout failed"),
        }
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Live controller attached to the current document.
#[wasm_bindgen]
pub struct GalleryPage {
    driver: Driver,
    listeners: Vec<Listener>,
}

fn input_value(event: &Event) -> String {
    event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

#[wasm_bindgen]
impl GalleryPage {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<GalleryPage, JsValue> {
        Self::with_config(None)
    }

    /// Attach with a (partial) JSON override of the controller config.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: Option<String>) -> Result<GalleryPage, JsValue> {
        let config = match config_json {
            Some(json) => ControllerConfig::from_json(&json).map_err(to_js)?,
            None => ControllerConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

        let lookup = |id: &str| -> Result<EventTarget, JsValue> {
            document
                .get_element_by_id(id)
                .map(EventTarget::from)
                .ok_or_else(|| to_js(crate::Error::MissingElement(id.to_string())))
        };
        let overlay = lookup(&config.overlay_id)?;
        let search = lookup(&config.search_id)?;
        let width = lookup(&config.width_id)?;
        let spacing = lookup(&config.spacing_id)?;

        let controller =
            GalleryController::new(WebDom::new(document.clone()), PerformanceClock, config)
                .map_err(to_js)?;
        let mut page = GalleryPage {
            driver: Driver {
                controller: Rc::new(RefCell::new(controller)),
                armed: Rc::new(Cell::new(None)),
            },
            listeners: Vec::new(),
        };

        page.listen(&overlay, "mousemove", |event| {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            Some(PageEvent::PointerMove {
                x: f64::from(mouse.offset_x()),
                y: f64::from(mouse.offset_y()),
            })
        })?;
        page.listen(&overlay, "mouseout", |_| Some(PageEvent::PointerOut))?;
        page.listen(&window.into(), "scroll", |_| Some(PageEvent::Scroll))?;
        page.listen(&document.into(), "keyup", |event| {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            Some(PageEvent::KeyUp(KeyPress::new(key.ctrl_key(), key.key())))
        })?;
        for (target, control) in [(&width, RangeControl::Width), (&spacing, RangeControl::Spacing)] {
            page.listen(target, "input", move |event| {
                Some(PageEvent::RangeInput { control, value: input_value(event) })
            })?;
            page.listen(target, "change", move |event| {
                Some(PageEvent::RangeChange { control, value: input_value(event) })
            })?;
        }
        page.listen(&search, "blur", |_| Some(PageEvent::SearchBlur))?;
        page.listen(&search, "input", |_| Some(PageEvent::SearchInput))?;

        page.driver.arm();
        Ok(page)
    }

    /// Remove every listener this page attached.
    pub fn detach(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

impl GalleryPage {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        translate: impl Fn(&Event) -> Option<PageEvent> + 'static,
    ) -> Result<(), JsValue> {
        let driver = self.driver.clone();
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if let Some(page_event) = translate(&event) {
                driver.dispatch(page_event);
            }
        }) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener { target: target.clone(), kind, callback });
        Ok(())
    }
}

impl Drop for GalleryPage {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Attach to the current document for the lifetime of the page.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let page = GalleryPage::new()?;
    std::mem::forget(page);
    Ok(())
}
