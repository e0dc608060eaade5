//! [`HeaderDom`] over the live browser document

use headernav_core::HeaderDom;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

/// Live document handle; clones share the same page
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// `location.pathname`, empty if unavailable
    pub fn page_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    /// `location.href`, empty if unavailable
    pub fn page_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn html(node: &Element) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }
}

impl HeaderDom for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query(&self, root: Option<&Element>, selector: &str) -> Option<Element> {
        let found = match root {
            Some(root) => root.query_selector(selector),
            None => self.document.query_selector(selector),
        };
        found.ok().flatten()
    }

    fn query_all(&self, root: Option<&Element>, selector: &str) -> Vec<Element> {
        let list = match root {
            Some(root) => root.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        let Ok(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn descendants(&self, root: &Element) -> Vec<Element> {
        self.query_all(Some(root), "*")
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(el) = Self::html(node) else {
            return;
        };
        let style = el.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn set_inner_html(&self, node: &Element, markup: &str) {
        node.set_inner_html(markup);
    }

    fn body_overflow(&self) -> String {
        self.document
            .body()
            .and_then(|body| body.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }

    fn set_body_overflow(&self, value: &str) {
        if let Some(body) = self.document.body() {
            let style = body.style();
            if value.is_empty() {
                let _ = style.remove_property("overflow");
            } else {
                let _ = style.set_property("overflow", value);
            }
        }
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&self, node: &Element) -> bool {
        match Self::html(node) {
            Some(el) => el.focus().is_ok(),
            None => false,
        }
    }

    fn can_receive_focus(&self, node: &Element) -> bool {
        node.is_connected() && Self::html(node).is_some()
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(f64::MAX)
    }

    fn bounding_bottom(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().bottom()
    }
}
