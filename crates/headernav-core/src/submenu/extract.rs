//! Item extraction from a fetched source page
//!
//! The page text is parsed into a detached `scraper` document, so nothing
//! in it runs or touches the live page.

use super::spec::{SubmenuItem, SubmenuSpec};
use crate::error::NavError;
use scraper::{ElementRef, Html, Selector};

fn parse_selector(selector: &str) -> Result<Selector, NavError> {
    Selector::parse(selector).map_err(|e| NavError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// First `max_items` candidates in document order as submenu items
///
/// Zero candidates is an error so the caller renders the fallback link.
pub fn extract_items(
    html: &str,
    spec: &SubmenuSpec,
    heading_fallback: &str,
) -> Result<Vec<SubmenuItem>, NavError> {
    let item_selector = parse_selector(&spec.item_selector)?;
    let title_selector = parse_selector(&spec.title_selector)?;
    let heading_selector = parse_selector(heading_fallback)?;

    let doc = Html::parse_document(html);
    let items: Vec<SubmenuItem> = doc
        .select(&item_selector)
        .take(spec.max_items)
        .enumerate()
        .map(|(i, el)| {
            let position = i + 1;
            let id = match el.value().attr("id").map(str::trim) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => format!("item-{position}"),
            };
            let title = first_text(el, &title_selector)
                .or_else(|| first_text(el, &heading_selector))
                .unwrap_or_else(|| format!("Item {position}"));
            SubmenuItem {
                anchor: anchor_for(&spec.source, &id),
                title,
            }
        })
        .collect();

    if items.is_empty() {
        return Err(NavError::NoCandidates {
            url: spec.source.clone(),
            selector: spec.item_selector.clone(),
        });
    }
    Ok(items)
}

/// Trimmed text of the first match with any text at all
fn first_text(el: ElementRef<'_>, selector: &Selector) -> Option<String> {
    el.select(selector)
        .map(|m| m.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}

/// Source reference with its fragment replaced by `id`
pub fn anchor_for(source: &str, id: &str) -> String {
    let base = source.split('#').next().unwrap_or(source);
    format!("{base}#{id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubmenuDefaults;

    fn spec(max_items: usize) -> SubmenuSpec {
        SubmenuSpec::new("products.html", &SubmenuDefaults::default()).with_max_items(max_items)
    }

    const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";

    #[test]
    fn test_first_n_in_document_order() {
        let cards: String = (1..=9)
            .map(|i| format!(r#"<article id="p{i}"><h2>Product {i}</h2></article>"#))
            .collect();
        let html = format!("<html><body><main>{cards}</main></body></html>");

        let items = extract_items(&html, &spec(5), HEADINGS).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Product 1", "Product 2", "Product 3", "Product 4", "Product 5"]
        );
        assert_eq!(items[0].anchor, "products.html#p1");
    }

    #[test]
    fn test_positional_id_for_missing_identifier() {
        let html = r#"
            <section id="intro"><h2>Intro</h2></section>
            <section id="specs"><h3>Specs</h3></section>
            <section><h2>Pricing</h2></section>
        "#;
        let items = extract_items(html, &spec(6), HEADINGS).unwrap();
        assert_eq!(items[2].anchor, "products.html#item-3");
        assert_eq!(items[2].title, "Pricing");
    }

    #[test]
    fn test_title_fallback_chain() {
        let html = r#"
            <div class="card"><span class="title">  Spaced  </span></div>
            <div class="card"><h5>Deep heading</h5></div>
            <div class="card"><h2>   </h2><h4>Second heading</h4></div>
            <div class="card"><p>No heading at all</p></div>
        "#;
        let items = extract_items(html, &spec(9), HEADINGS).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Spaced", "Deep heading", "Second heading", "Item 4"]
        );
    }

    #[test]
    fn test_zero_candidates_is_error() {
        let err = extract_items("<p>nothing here</p>", &spec(6), HEADINGS).unwrap_err();
        assert!(matches!(err, NavError::NoCandidates { .. }));
        assert!(err.is_fallback());
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let bad = spec(6).with_item_selector("article[");
        let err = extract_items("<article></article>", &bad, HEADINGS).unwrap_err();
        assert!(matches!(err, NavError::InvalidSelector { .. }));
    }

    #[test]
    fn test_source_fragment_replaced() {
        assert_eq!(anchor_for("guides.html#top", "setup"), "guides.html#setup");
        assert_eq!(anchor_for("/docs/", "item-1"), "/docs/#item-1");
    }

    #[test]
    fn test_scripts_in_source_are_inert_text() {
        let html = r#"<article><h2><script>alert(1)</script></h2></article>"#;
        let items = extract_items(html, &spec(6), HEADINGS).unwrap();
        assert_eq!(items[0].title, "alert(1)");
    }
}
