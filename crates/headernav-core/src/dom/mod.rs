//! DOM query layer
//!
//! Everything the widget touches goes through [`HeaderDom`]. The browser
//! binding implements it over `web-sys`; [`MemoryDom`] implements it
//! headlessly for tests and non-browser hosts.
//!
//! Absence is never an error: lookups return `Option` and every consumer
//! treats `None` as "this behavior does not apply on this page".

pub mod memory;
mod selector;

pub use memory::{MemoryDom, NodeId};
pub use selector::{validate_selector, SelectorGroup};

use crate::config::NavConfig;

/// Host document capability consumed by the widget
///
/// All methods take `&self`: the host document is shared, single-threaded
/// state and implementations use interior mutability.
pub trait HeaderDom {
    /// Cheap, cloneable handle to an element
    type Node: Clone + PartialEq + std::fmt::Debug;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// First element matching `selector` under `root` (whole document if `None`)
    fn query(&self, root: Option<&Self::Node>, selector: &str) -> Option<Self::Node>;

    /// All elements matching `selector` under `root`, in document order
    fn query_all(&self, root: Option<&Self::Node>, selector: &str) -> Vec<Self::Node>;

    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// All element descendants of `root`, in document order (root excluded)
    fn descendants(&self, root: &Self::Node) -> Vec<Self::Node>;

    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Set an inline style property; an empty value clears it
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Replace the element's children with parsed `markup`
    fn set_inner_html(&self, node: &Self::Node, markup: &str);

    fn body_overflow(&self) -> String;
    fn set_body_overflow(&self, value: &str);

    fn active_element(&self) -> Option<Self::Node>;

    /// Move focus; returns false if the element could not take it
    fn focus(&self, node: &Self::Node) -> bool;

    /// Still attached to the document and able to take focus
    fn can_receive_focus(&self, node: &Self::Node) -> bool;

    /// Layout viewport width in CSS pixels
    fn viewport_width(&self) -> f64;

    /// Bottom edge of the element relative to the viewport top
    fn bounding_bottom(&self, node: &Self::Node) -> f64;

    fn has_class_any(&self, node: &Self::Node, classes: &[&str]) -> bool {
        classes.iter().any(|c| self.has_class(node, c))
    }
}

/// Elements the widget depends on, resolved once per interaction
#[derive(Debug, Clone)]
pub struct NavElements<N> {
    pub nav: Option<N>,
    pub toggle: Option<N>,
    pub backdrop: Option<N>,
    pub drawer_close: Option<N>,
    pub theme_bar: Option<N>,
    pub hero: Option<N>,
}

impl<N: Clone> NavElements<N> {
    pub fn resolve<D: HeaderDom<Node = N>>(dom: &D, config: &NavConfig) -> Self {
        let nav = dom.element_by_id(&config.ids.nav);
        let drawer_close = dom.query(nav.as_ref(), &config.selectors.drawer_close);
        Self {
            toggle: dom.element_by_id(&config.ids.toggle),
            backdrop: dom.element_by_id(&config.ids.backdrop),
            theme_bar: dom.element_by_id(&config.ids.theme_bar),
            hero: dom.query(None, &config.selectors.hero),
            drawer_close,
            nav,
        }
    }

    /// Nav container and backdrop, the minimum for any drawer behavior
    pub fn drawer_parts(&self) -> Option<(N, N)> {
        Some((self.nav.clone()?, self.backdrop.clone()?))
    }
}
