//! Headless in-memory document
//!
//! Built from HTML text with `scraper`, then mutated through [`HeaderDom`].
//! Layout is not computed: viewport width and per-element bounding boxes
//! are plain values the host (or a test) sets explicitly.
//!
//! Nodes live in an append-only arena. Replaced or detached elements keep
//! their slot (marked detached) so stale handles stay valid, which means a
//! document that is repopulated many times only grows. Handles from another
//! document are ignored: lookups return `None` and mutations do nothing.

use super::selector::SelectorGroup;
use super::HeaderDom;
use crate::focus;
use parking_lot::Mutex;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, PseudoElement, Simple};
use scraper::{ElementRef, Html};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{ElementSelectorFlags, MatchingContext};
use selectors::parser::SelectorImpl;
use selectors::{Element, OpaqueElement};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

type Namespace = <Simple as SelectorImpl>::NamespaceUrl;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Handle to an element in a [`MemoryDom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct MemNode {
    tag: String,
    namespace: Namespace,
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Non-empty text directly inside the element (`:empty` matching)
    has_text: bool,
    inner_html: String,
    styles: BTreeMap<String, String>,
    bottom: f64,
    attached: bool,
}

#[derive(Debug)]
struct Inner {
    nodes: Vec<MemNode>,
    root: NodeId,
    body_overflow: String,
    active: Option<NodeId>,
    viewport_width: f64,
}

/// Shared, cloneable headless document
#[derive(Debug, Clone)]
pub struct MemoryDom {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDom {
    /// Default viewport width for a freshly parsed document
    pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

    /// Parse a full document (fragments are wrapped in `<html><body>`)
    pub fn from_html(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let mut inner = Inner {
            nodes: Vec::new(),
            root: NodeId(0),
            body_overflow: String::new(),
            active: None,
            viewport_width: Self::DEFAULT_VIEWPORT_WIDTH,
        };
        inner.root = inner.import(doc.root_element(), None);
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    pub fn set_viewport_width(&self, width: f64) {
        self.inner.lock().viewport_width = width;
    }

    pub fn set_bounding_bottom(&self, node: &NodeId, bottom: f64) {
        if let Some(n) = self.inner.lock().node_mut(*node) {
            n.bottom = bottom;
        }
    }

    /// Remove an element (and its subtree) from the document
    pub fn detach(&self, node: &NodeId) {
        let mut inner = self.inner.lock();
        let Some(parent) = inner.node(*node).and_then(|n| n.parent) else {
            inner.mark_detached(*node);
            return;
        };
        if let Some(p) = inner.node_mut(parent) {
            p.children.retain(|c| c != node);
        }
        inner.mark_detached(*node);
    }

    /// Markup of the element's children as last parsed or set
    pub fn inner_html(&self, node: &NodeId) -> String {
        self.inner
            .lock()
            .node(*node)
            .map(|n| n.inner_html.clone())
            .unwrap_or_default()
    }

    pub fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.inner.lock().node(*node)?.styles.get(property).cloned()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.query(None, "body")
    }

    /// Number of arena slots, detached ones included
    pub fn node_count(&self) -> usize {
        self.inner.lock().nodes.len()
    }
}

impl Inner {
    fn node(&self, id: NodeId) -> Option<&MemNode> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut MemNode> {
        self.nodes.get_mut(id.0)
    }

    fn import(&mut self, el: ElementRef<'_>, parent: Option<NodeId>) -> NodeId {
        let value = el.value();
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemNode {
            tag: value.name().to_ascii_lowercase(),
            namespace: value.name.ns.clone(),
            attrs: value
                .attrs()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
            parent,
            children: Vec::new(),
            has_text: el
                .children()
                .any(|c| c.value().as_text().is_some_and(|t| !t.is_empty())),
            inner_html: el.inner_html(),
            styles: BTreeMap::new(),
            bottom: 0.0,
            attached: true,
        });

        for child in el.children() {
            if let Some(child_el) = ElementRef::wrap(child) {
                let child_id = self.import(child_el, Some(id));
                self.nodes[id.0].children.push(child_id);
            }
        }
        id
    }

    fn mark_detached(&mut self, node: NodeId) {
        let Some(n) = self.node_mut(node) else {
            return;
        };
        n.attached = false;
        let children = n.children.clone();
        if self.active == Some(node) {
            self.active = None;
        }
        for child in children {
            self.mark_detached(child);
        }
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn matches(&self, node: NodeId, group: &SelectorGroup) -> bool {
        self.node(node).is_some() && group.matches(&MatchNode { inner: self, id: node })
    }

    /// Depth-first, document-order element walk below `root`
    fn walk(&self, root: NodeId, out: &mut Vec<NodeId>) {
        let Some(n) = self.node(root) else {
            return;
        };
        for &child in &n.children {
            out.push(child);
            self.walk(child, out);
        }
    }

    fn scope(&self, root: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        match root {
            Some(r) => self.walk(r, &mut out),
            None => {
                out.push(self.root);
                self.walk(self.root, &mut out);
            }
        }
        out
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(n) = self.node_mut(node) else {
            return;
        };
        match n.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => n.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn class_list(&self, node: NodeId) -> Vec<String> {
        self.attr(node, "class")
            .unwrap_or("")
            .split_ascii_whitespace()
            .map(str::to_string)
            .collect()
    }
}

fn parse_group(selector: &str) -> Option<SelectorGroup> {
    SelectorGroup::parse(selector)
        .map_err(|e| warn!(error = %e, "selector matches nothing"))
        .ok()
}

// ============================================================================
// Selector matching
// ============================================================================

/// Borrowed view of one arena node for the `selectors` engine
///
/// Only built for ids already checked against `inner`; links between
/// nodes always stay inside the arena.
#[derive(Clone, Copy)]
struct MatchNode<'a> {
    inner: &'a Inner,
    id: NodeId,
}

impl fmt::Debug for MatchNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchNode")
            .field("id", &self.id)
            .field("tag", &self.node().tag)
            .finish()
    }
}

impl<'a> MatchNode<'a> {
    fn node(&self) -> &'a MemNode {
        &self.inner.nodes[self.id.0]
    }

    fn at(&self, id: NodeId) -> Self {
        Self {
            inner: self.inner,
            id,
        }
    }

    fn sibling(&self, offset: isize) -> Option<Self> {
        let parent = self.inner.node(self.node().parent?)?;
        let pos = parent.children.iter().position(|&c| c == self.id)?;
        let target = pos.checked_add_signed(offset)?;
        parent.children.get(target).map(|&id| self.at(id))
    }
}

/// Dynamic pseudo-classes never match: there is no hover or focus state.
impl<'a> Element for MatchNode<'a> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node())
    }

    fn parent_element(&self) -> Option<Self> {
        self.node().parent.map(|p| self.at(p))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling(-1)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling(1)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.node().children.first().map(|&c| self.at(c))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        &*self.node().namespace == HTML_NAMESPACE
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        &*name.0 == self.node().tag.as_str()
    }

    fn has_namespace(&self, namespace: &Namespace) -> bool {
        self.node().namespace == *namespace
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.node().tag == other.node().tag && self.node().namespace == other.node().namespace
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&Namespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // attributes are stored without a namespace
        if matches!(*ns, NamespaceConstraint::Specific(url) if !url.is_empty()) {
            return false;
        }
        self.node()
            .attrs
            .iter()
            .any(|(key, value)| &*local_name.0 == key.as_str() && operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.node().tag.as_str(), "a" | "area" | "link")
            && self.inner.attr(self.id, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.node().tag == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.inner
            .attr(self.id, "id")
            .is_some_and(|have| case_sensitivity.eq(id.0.as_bytes(), have.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.inner.attr(self.id, "class").is_some_and(|classes| {
            classes
                .split_ascii_whitespace()
                .any(|have| case_sensitivity.eq(name.0.as_bytes(), have.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.node().children.is_empty() && !self.node().has_text
    }

    fn is_root(&self) -> bool {
        self.id == self.inner.root
    }
}

// ============================================================================
// HeaderDom
// ============================================================================

impl HeaderDom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let inner = self.inner.lock();
        inner
            .scope(None)
            .into_iter()
            .find(|&n| inner.attr(n, "id") == Some(id))
    }

    fn query(&self, root: Option<&NodeId>, selector: &str) -> Option<NodeId> {
        self.query_all(root, selector).into_iter().next()
    }

    fn query_all(&self, root: Option<&NodeId>, selector: &str) -> Vec<NodeId> {
        let Some(group) = parse_group(selector) else {
            return Vec::new();
        };
        let inner = self.inner.lock();
        inner
            .scope(root.copied())
            .into_iter()
            .filter(|&n| inner.matches(n, &group))
            .collect()
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Option<NodeId> {
        let group = parse_group(selector)?;
        let inner = self.inner.lock();
        let mut current = Some(*node);
        while let Some(n) = current {
            if inner.matches(n, &group) {
                return Some(n);
            }
            current = inner.node(n)?.parent;
        }
        None
    }

    fn descendants(&self, root: &NodeId) -> Vec<NodeId> {
        self.inner.lock().scope(Some(*root))
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.inner
            .lock()
            .node(*node)
            .map(|n| n.tag.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.inner.lock().attr(*node, name).map(str::to_string)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.inner.lock().set_attr(*node, name, value);
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        if let Some(n) = self.inner.lock().node_mut(*node) {
            n.attrs.retain(|(k, _)| k != name);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.inner.lock().class_list(*node).iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut inner = self.inner.lock();
        let mut classes = inner.class_list(*node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            inner.set_attr(*node, "class", &classes.join(" "));
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut inner = self.inner.lock();
        let mut classes = inner.class_list(*node);
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            inner.set_attr(*node, "class", &classes.join(" "));
        }
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut inner = self.inner.lock();
        let Some(n) = inner.node_mut(*node) else {
            return;
        };
        if value.is_empty() {
            n.styles.remove(property);
        } else {
            n.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_inner_html(&self, node: &NodeId, markup: &str) {
        let fragment = Html::parse_fragment(markup);
        let mut inner = self.inner.lock();
        let Some(target) = inner.node_mut(*node) else {
            return;
        };

        let old_children = std::mem::take(&mut target.children);
        let attached = target.attached;
        for child in old_children {
            inner.mark_detached(child);
        }

        let container = fragment.root_element();
        let mut children = Vec::new();
        for child in container.children() {
            if let Some(child_el) = ElementRef::wrap(child) {
                let child_id = inner.import(child_el, Some(*node));
                if !attached {
                    inner.mark_detached(child_id);
                }
                children.push(child_id);
            }
        }
        let has_text = container
            .children()
            .any(|c| c.value().as_text().is_some_and(|t| !t.is_empty()));

        if let Some(target) = inner.node_mut(*node) {
            target.children = children;
            target.has_text = has_text;
            target.inner_html = markup.to_string();
        }
    }

    fn body_overflow(&self) -> String {
        self.inner.lock().body_overflow.clone()
    }

    fn set_body_overflow(&self, value: &str) {
        self.inner.lock().body_overflow = value.to_string();
    }

    fn active_element(&self) -> Option<NodeId> {
        self.inner.lock().active
    }

    fn focus(&self, node: &NodeId) -> bool {
        if !self.can_receive_focus(node) {
            return false;
        }
        self.inner.lock().active = Some(*node);
        true
    }

    fn can_receive_focus(&self, node: &NodeId) -> bool {
        let inner = self.inner.lock();
        let Some(n) = inner.node(*node) else {
            return false;
        };
        if !n.attached {
            return false;
        }
        let attr = |name: &str| inner.attr(*node, name);
        focus::is_focusable(&n.tag, &attr) || attr("tabindex").is_some()
    }

    fn viewport_width(&self) -> f64 {
        self.inner.lock().viewport_width
    }

    fn bounding_bottom(&self, node: &NodeId) -> f64 {
        self.inner.lock().node(*node).map_or(0.0, |n| n.bottom)
    }
}
