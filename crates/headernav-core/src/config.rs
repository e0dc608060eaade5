//! Widget configuration
//!
//! Every field has a default matching the stock header markup, so an empty
//! TOML/JSON document is a valid configuration.

use crate::dom::validate_selector;
use crate::error::NavError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hard upper bound on items rendered into one dynamic submenu
pub const MAX_ITEMS_CAP: usize = 9;

/// Top-level widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavConfig {
    /// Widths at or below this are "narrow" (drawer layout)
    pub breakpoint_px: f64,

    /// Stable element ids
    pub ids: ElementIds,

    /// Selectors for the markup contract
    pub selectors: Selectors,

    /// Class names toggled by the widget
    pub classes: ClassNames,

    /// Page name used when the current path has an empty final segment
    pub home_page: String,

    /// Custom event dispatched after the header fragment is injected
    pub ready_event: String,

    /// Dynamic submenu defaults
    pub submenu: SubmenuDefaults,

    /// Versioned submenu cache
    pub cache: CacheConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: crate::viewport::DEFAULT_BREAKPOINT_PX,
            ids: ElementIds::default(),
            selectors: Selectors::default(),
            classes: ClassNames::default(),
            home_page: "index.html".to_string(),
            ready_event: "header:ready".to_string(),
            submenu: SubmenuDefaults::default(),
            cache: CacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub nav: String,
    pub toggle: String,
    pub backdrop: String,
    /// Bar that receives the light/dark theme classes
    pub theme_bar: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            nav: "primary-nav".to_string(),
            toggle: "menu-toggle".to_string(),
            backdrop: "backdrop".to_string(),
            theme_bar: "navbar".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Selectors {
    pub drawer_close: String,
    pub submenu_trigger: String,
    /// Accordion group (the `<li>` owning a submenu)
    pub group: String,
    /// Disclosure control carrying `aria-expanded`
    pub disclosure: String,
    /// List element shown/hidden by the accordion
    pub group_list: String,
    pub hero: String,
    /// Lists whose content is fetched from another page
    pub dynamic_list: String,
    pub links: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            drawer_close: ".drawer-close".to_string(),
            submenu_trigger: ".has-submenu, .submenu-toggle".to_string(),
            group: ".dropdown".to_string(),
            disclosure: ".submenu-toggle".to_string(),
            group_list: ".dropdown-menu".to_string(),
            hero: ".hero".to_string(),
            dynamic_list: "[data-source]".to_string(),
            links: "a[href]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    pub open: String,
    pub backdrop_visible: String,
    pub active: String,
    pub light: String,
    pub dark: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            open: "open".to_string(),
            backdrop_visible: "show".to_string(),
            active: "active".to_string(),
            light: "light-nav".to_string(),
            dark: "dark-nav".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmenuDefaults {
    pub item_selector: String,
    pub title_selector: String,
    /// Second link of the title fallback chain
    pub heading_fallback: String,
    pub max_items: usize,
    pub fallback_label: String,
}

impl Default for SubmenuDefaults {
    fn default() -> Self {
        Self {
            item_selector: "article, section, .card".to_string(),
            title_selector: "h2, h3, .title".to_string(),
            heading_fallback: "h1, h2, h3, h4, h5, h6".to_string(),
            max_items: 6,
            fallback_label: "View all".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    /// Bump to invalidate every cached submenu
    pub version: u32,
    pub prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            version: 1,
            prefix: "headernav".to_string(),
        }
    }
}

impl NavConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, NavError> {
        let config: NavConfig = toml::from_str(content).map_err(|e| NavError::ConfigToml {
            message: e.message().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document (browser inline config)
    pub fn from_json_str(content: &str) -> Result<Self, NavError> {
        let config: NavConfig =
            serde_json::from_str(content).map_err(|source| NavError::ConfigJson { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, NavError> {
        let content = std::fs::read_to_string(path).map_err(|source| NavError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), NavError> {
        if !(self.breakpoint_px.is_finite() && self.breakpoint_px > 0.0) {
            return Err(NavError::InvalidConfig {
                message: format!("breakpointPx must be positive, got {}", self.breakpoint_px),
            });
        }
        if self.submenu.max_items == 0 {
            return Err(NavError::InvalidConfig {
                message: "submenu.maxItems must be at least 1".to_string(),
            });
        }
        if self.ids.nav.is_empty() || self.ids.backdrop.is_empty() {
            return Err(NavError::InvalidConfig {
                message: "nav and backdrop ids cannot be empty".to_string(),
            });
        }
        for (field, selector) in self.selector_fields() {
            validate_selector(selector).map_err(|e| NavError::InvalidConfig {
                message: format!("{field}: {e}"),
            })?;
        }
        Ok(())
    }

    fn selector_fields(&self) -> [(&'static str, &str); 11] {
        let s = &self.selectors;
        let sub = &self.submenu;
        [
            ("selectors.drawerClose", s.drawer_close.as_str()),
            ("selectors.submenuTrigger", s.submenu_trigger.as_str()),
            ("selectors.group", s.group.as_str()),
            ("selectors.disclosure", s.disclosure.as_str()),
            ("selectors.groupList", s.group_list.as_str()),
            ("selectors.hero", s.hero.as_str()),
            ("selectors.dynamicList", s.dynamic_list.as_str()),
            ("selectors.links", s.links.as_str()),
            ("submenu.itemSelector", sub.item_selector.as_str()),
            ("submenu.titleSelector", sub.title_selector.as_str()),
            ("submenu.headingFallback", sub.heading_fallback.as_str()),
        ]
    }
}
