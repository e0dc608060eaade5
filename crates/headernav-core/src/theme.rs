//! Scroll-driven light/dark theme for the header bar

use crate::config::NavConfig;
use crate::dom::{HeaderDom, NavElements};
use serde::{Deserialize, Serialize};

/// Theme tag applied to the header bar (mutually exclusive pair)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavTheme {
    /// Hero scrolled out of view
    Light,
    /// Over the hero region
    Dark,
}

impl NavTheme {
    /// Light once the hero's bottom edge is at or above the viewport top
    pub fn from_hero_bottom(hero_bottom: f64) -> Self {
        if hero_bottom <= 0.0 {
            NavTheme::Light
        } else {
            NavTheme::Dark
        }
    }
}

/// Recompute and apply the theme; `None` when the bar or hero is absent
pub fn apply_theme<D: HeaderDom>(
    dom: &D,
    elements: &NavElements<D::Node>,
    config: &NavConfig,
) -> Option<NavTheme> {
    let bar = elements.theme_bar.as_ref()?;
    let hero = elements.hero.as_ref()?;

    let theme = NavTheme::from_hero_bottom(dom.bounding_bottom(hero));
    let (add, remove) = match theme {
        NavTheme::Light => (&config.classes.light, &config.classes.dark),
        NavTheme::Dark => (&config.classes.dark, &config.classes.light),
    };
    dom.remove_class(bar, remove);
    dom.add_class(bar, add);
    Some(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    const PAGE: &str = r#"<header id="navbar"></header><section class="hero"></section>"#;

    #[test]
    fn test_theme_threshold() {
        assert_eq!(NavTheme::from_hero_bottom(120.0), NavTheme::Dark);
        assert_eq!(NavTheme::from_hero_bottom(0.0), NavTheme::Light);
        assert_eq!(NavTheme::from_hero_bottom(-50.0), NavTheme::Light);
    }

    #[test]
    fn test_apply_swaps_classes() {
        let dom = MemoryDom::from_html(PAGE);
        let config = NavConfig::default();
        let els = NavElements::resolve(&dom, &config);
        let bar = els.theme_bar.unwrap();
        let hero = els.hero.unwrap();

        dom.set_bounding_bottom(&hero, 300.0);
        assert_eq!(apply_theme(&dom, &els, &config), Some(NavTheme::Dark));
        assert!(dom.has_class(&bar, "dark-nav"));
        assert!(!dom.has_class(&bar, "light-nav"));

        dom.set_bounding_bottom(&hero, -1.0);
        assert_eq!(apply_theme(&dom, &els, &config), Some(NavTheme::Light));
        assert!(dom.has_class(&bar, "light-nav"));
        assert!(!dom.has_class(&bar, "dark-nav"));
    }

    #[test]
    fn test_no_hero_is_noop() {
        let dom = MemoryDom::from_html(r#"<header id="navbar"></header>"#);
        let config = NavConfig::default();
        let els = NavElements::resolve(&dom, &config);
        assert_eq!(apply_theme(&dom, &els, &config), None);
        let bar = els.theme_bar.unwrap();
        assert!(dom.attribute(&bar, "class").is_none());
    }
}
