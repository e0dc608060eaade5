//! Per-list submenu declaration and the items derived from it

use crate::config::{CacheConfig, SubmenuDefaults, MAX_ITEMS_CAP};
use crate::dom::HeaderDom;
use serde::{Deserialize, Serialize};
use url::Url;

/// One dynamic dropdown list, as declared by its `data-*` attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmenuSpec {
    /// Source page reference exactly as written in the markup
    pub source: String,
    pub item_selector: String,
    pub title_selector: String,
    /// Always within `1..=MAX_ITEMS_CAP`
    pub max_items: usize,
}

impl SubmenuSpec {
    pub fn new(source: impl Into<String>, defaults: &SubmenuDefaults) -> Self {
        Self {
            source: source.into(),
            item_selector: defaults.item_selector.clone(),
            title_selector: defaults.title_selector.clone(),
            max_items: clamp_max_items(defaults.max_items),
        }
    }

    pub fn with_item_selector(mut self, selector: impl Into<String>) -> Self {
        self.item_selector = selector.into();
        self
    }

    pub fn with_title_selector(mut self, selector: impl Into<String>) -> Self {
        self.title_selector = selector.into();
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = clamp_max_items(max_items);
        self
    }

    /// Read `data-source` and its optional overrides from a list element
    ///
    /// Returns `None` when `data-source` is missing or blank. Blank or
    /// unparsable overrides fall back to the defaults.
    pub fn from_element<D: HeaderDom>(
        dom: &D,
        node: &D::Node,
        defaults: &SubmenuDefaults,
    ) -> Option<Self> {
        let source = dom.attribute(node, "data-source")?;
        let source = source.trim();
        if source.is_empty() {
            return None;
        }

        let mut spec = Self::new(source, defaults);
        if let Some(selector) = non_blank(dom.attribute(node, "data-item-selector")) {
            spec = spec.with_item_selector(selector);
        }
        if let Some(selector) = non_blank(dom.attribute(node, "data-title-selector")) {
            spec = spec.with_title_selector(selector);
        }
        if let Some(max) = dom
            .attribute(node, "data-max-items")
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            spec = spec.with_max_items(max);
        }
        Some(spec)
    }

    /// Versioned cache key for this declaration fetched from `resolved`
    ///
    /// The resolved URL (fragment dropped) identifies the page, so equal
    /// `data-source` strings on pages in different directories never share
    /// an entry. Anchors are written relative to the raw source, so it is
    /// part of the key too.
    pub fn cache_key(&self, cache: &CacheConfig, resolved: &Url) -> String {
        let mut page = resolved.clone();
        page.set_fragment(None);
        format!(
            "{}{}|{}|{}|{}|{}",
            version_prefix(cache),
            page,
            self.source,
            self.item_selector,
            self.title_selector,
            self.max_items
        )
    }
}

/// `<prefix>:v<version>:`
pub(crate) fn version_prefix(cache: &CacheConfig) -> String {
    format!("{}:v{}:", cache.prefix, cache.version)
}

pub fn clamp_max_items(max_items: usize) -> usize {
    max_items.clamp(1, MAX_ITEMS_CAP)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A scraped link: anchor into the source page plus its raw title
///
/// The title is stored unescaped and escaped when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuItem {
    pub anchor: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn test_defaults_applied() {
        let dom = MemoryDom::from_html(r#"<ul data-source="products.html"></ul>"#);
        let list = dom.query(None, "ul").unwrap();
        let spec = SubmenuSpec::from_element(&dom, &list, &SubmenuDefaults::default()).unwrap();

        assert_eq!(spec.source, "products.html");
        assert_eq!(spec.item_selector, "article, section, .card");
        assert_eq!(spec.title_selector, "h2, h3, .title");
        assert_eq!(spec.max_items, 6);
    }

    #[test]
    fn test_overrides_and_clamping() {
        let dom = MemoryDom::from_html(
            r#"
            <ul id="a" data-source=" guides/ " data-item-selector=".guide"
                data-title-selector="  " data-max-items="40"></ul>
            <ul id="b" data-source="x.html" data-max-items="0"></ul>
            <ul id="c" data-source="y.html" data-max-items="lots"></ul>
            <ul id="d" data-source=""></ul>
            <ul id="e"></ul>
            "#,
        );
        let defaults = SubmenuDefaults::default();
        let spec = |id: &str| {
            let node = dom.element_by_id(id).unwrap();
            SubmenuSpec::from_element(&dom, &node, &defaults)
        };

        let a = spec("a").unwrap();
        assert_eq!(a.source, "guides/");
        assert_eq!(a.item_selector, ".guide");
        assert_eq!(a.title_selector, "h2, h3, .title");
        assert_eq!(a.max_items, MAX_ITEMS_CAP);

        assert_eq!(spec("b").unwrap().max_items, 1);
        assert_eq!(spec("c").unwrap().max_items, 6);
        assert!(spec("d").is_none());
        assert!(spec("e").is_none());
    }

    #[test]
    fn test_cache_key_is_versioned() {
        let spec = SubmenuSpec::new("products.html", &SubmenuDefaults::default()).with_max_items(5);
        let resolved = Url::parse("https://example.com/shop/products.html#top").unwrap();
        let mut cache = CacheConfig::default();
        assert_eq!(
            spec.cache_key(&cache, &resolved),
            "headernav:v1:https://example.com/shop/products.html|products.html|article, section, .card|h2, h3, .title|5"
        );

        cache.version = 2;
        assert!(spec.cache_key(&cache, &resolved).starts_with("headernav:v2:"));
    }

    #[test]
    fn test_cache_key_distinguishes_directories() {
        let spec = SubmenuSpec::new("products.html", &SubmenuDefaults::default());
        let cache = CacheConfig::default();
        let shop = Url::parse("https://example.com/shop/products.html").unwrap();
        let blog = Url::parse("https://example.com/blog/products.html").unwrap();
        assert_ne!(spec.cache_key(&cache, &shop), spec.cache_key(&cache, &blog));

        let relative = SubmenuSpec::new("../shop/products.html", &SubmenuDefaults::default());
        assert_ne!(spec.cache_key(&cache, &shop), relative.cache_key(&cache, &shop));
    }
}
