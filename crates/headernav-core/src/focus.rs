//! Focus trap for the open drawer
//!
//! Tab / Shift+Tab at either end of the nav container's focusable
//! descendants wraps around instead of leaving the drawer.

use crate::dom::HeaderDom;

/// Keyboard keys the widget reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            _ => Key::Other,
        }
    }
}

/// What the keydown handler should do with a Tab press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrapAction<N> {
    /// Let the browser move focus normally
    Allow,
    /// Prevent default and focus this element instead
    MoveTo(N),
    /// Prevent default, keep focus where it is (nothing focusable inside)
    Hold,
}

/// Tab-reachable per the usual focusable-element selector, minus anything
/// disabled, `aria-hidden="true"` or explicitly removed from tab order
pub fn is_focusable<'a>(tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
    if attr("disabled").is_some() || attr("aria-hidden") == Some("true") {
        return false;
    }

    let tab_index = attr("tabindex").map(|v| v.trim().parse::<i32>());
    match tab_index {
        Some(Ok(n)) if n < 0 => return false,
        Some(Ok(_)) => return true,
        _ => {}
    }

    match tag.to_ascii_lowercase().as_str() {
        "a" | "area" => attr("href").is_some(),
        "input" => attr("type").map_or(true, |t| !t.eq_ignore_ascii_case("hidden")),
        "button" | "select" | "textarea" => true,
        _ => false,
    }
}

/// Focusable descendants of `root` in document order
pub fn focusable_descendants<D: HeaderDom>(dom: &D, root: &D::Node) -> Vec<D::Node> {
    dom.descendants(root)
        .into_iter()
        .filter(|node| {
            let tag = dom.tag_name(node);
            let attrs: Vec<(&str, Option<String>)> = ["disabled", "aria-hidden", "tabindex", "href", "type"]
                .into_iter()
                .map(|name| (name, dom.attribute(node, name)))
                .collect();
            is_focusable(&tag, |name| {
                attrs
                    .iter()
                    .find(|(n, _)| *n == name)
                    .and_then(|(_, v)| v.as_deref())
            })
        })
        .collect()
}

/// Decide where a Tab press goes given the focusable list and current focus
pub fn trap_tab<N: Clone + PartialEq>(
    focusables: &[N],
    current: Option<&N>,
    shift: bool,
) -> TrapAction<N> {
    let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
        return TrapAction::Hold;
    };

    let position = current.and_then(|c| focusables.iter().position(|f| f == c));
    match (position, shift) {
        // focus escaped the container somehow: pull it back in
        (None, false) => TrapAction::MoveTo(first.clone()),
        (None, true) => TrapAction::MoveTo(last.clone()),
        (Some(0), true) => TrapAction::MoveTo(last.clone()),
        (Some(i), false) if i == focusables.len() - 1 => TrapAction::MoveTo(first.clone()),
        _ => TrapAction::Allow,
    }
}
