//! Submenu markup

use super::spec::SubmenuItem;

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn list_item(href: &str, text: &str) -> String {
    format!(
        r#"<li><a href="{}">{}</a></li>"#,
        escape_html(href),
        escape_html(text)
    )
}

/// One `<li><a>` per item, in order
pub fn render_items(items: &[SubmenuItem]) -> String {
    items
        .iter()
        .map(|item| list_item(&item.anchor, &item.title))
        .collect()
}

/// Single link to the unmodified source page
pub fn render_fallback(source: &str, label: &str) -> String {
    list_item(source, label)
}
