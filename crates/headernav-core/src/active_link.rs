//! One-shot active link classification

use crate::config::NavConfig;
use crate::dom::HeaderDom;

/// Final path segment of the current page, `home_page` when empty
pub fn current_page_name(path: &str, home_page: &str) -> String {
    let path = strip_suffixes(path);
    match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => home_page.to_string(),
    }
}

/// Whether a nav link's href designates the current page
///
/// Pure-fragment and empty hrefs never match. The href's own query and
/// fragment are ignored.
pub fn is_active_href(href: &str, current_page: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    strip_suffixes(href) == current_page
}

fn strip_suffixes(s: &str) -> &str {
    let end = s.find(['?', '#']).unwrap_or(s.len());
    &s[..end]
}

/// Tag every matching link inside the nav container; returns the count
pub fn mark_active_links<D: HeaderDom>(
    dom: &D,
    nav: &D::Node,
    page_path: &str,
    config: &NavConfig,
) -> usize {
    let here = current_page_name(page_path, &config.home_page);
    let mut marked = 0;
    for link in dom.query_all(Some(nav), &config.selectors.links) {
        let Some(href) = dom.attribute(&link, "href") else {
            continue;
        };
        if is_active_href(&href, &here) {
            dom.add_class(&link, &config.classes.active);
            marked += 1;
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn test_current_page_name() {
        assert_eq!(current_page_name("/", "index.html"), "index.html");
        assert_eq!(current_page_name("", "index.html"), "index.html");
        assert_eq!(current_page_name("/about.html", "index.html"), "about.html");
        assert_eq!(current_page_name("/docs/guide.html", "index.html"), "guide.html");
        assert_eq!(current_page_name("/docs/", "index.html"), "index.html");
        assert_eq!(current_page_name("/a.html?x=1", "index.html"), "a.html");
    }

    #[test]
    fn test_is_active_href() {
        assert!(is_active_href("about.html", "about.html"));
        assert!(is_active_href("about.html#team", "about.html"));
        assert!(is_active_href("about.html?ref=nav", "about.html"));
        assert!(!is_active_href("#about.html", "about.html"));
        assert!(!is_active_href("#", "index.html"));
        assert!(!is_active_href("", "index.html"));
        assert!(!is_active_href("contact.html", "about.html"));
    }

    #[test]
    fn test_mark_active_links() {
        let dom = MemoryDom::from_html(
            r##"
            <nav id="primary-nav">
              <a href="index.html">Home</a>
              <a href="about.html">About</a>
              <a href="#top">Top</a>
              <a>Bare</a>
            </nav>
            <a href="index.html" id="outside">Outside nav</a>
            "##,
        );
        let config = NavConfig::default();
        let nav = dom.element_by_id("primary-nav").unwrap();

        assert_eq!(mark_active_links(&dom, &nav, "/", &config), 1);

        let home = dom.query(Some(&nav), "a[href=\"index.html\"]").unwrap();
        let about = dom.query(Some(&nav), "a[href=\"about.html\"]").unwrap();
        let outside = dom.element_by_id("outside").unwrap();
        assert!(dom.has_class(&home, "active"));
        assert!(!dom.has_class(&about, "active"));
        assert!(!dom.has_class(&outside, "active"));
    }
}
