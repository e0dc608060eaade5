//! Site header component emitting the markup the widget drives

use headernav_core::NavConfig;
use leptos::prelude::*;

/// Remote source for a submenu list
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicSubmenu {
    pub source: String,
    pub item_selector: Option<String>,
    pub title_selector: Option<String>,
    pub max_items: Option<usize>,
}

impl DynamicSubmenu {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            item_selector: None,
            title_selector: None,
            max_items: None,
        }
    }
}

/// Top-level navigation entry
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub submenu: Option<DynamicSubmenu>,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            submenu: None,
        }
    }

    pub fn with_submenu(mut self, submenu: DynamicSubmenu) -> Self {
        self.submenu = Some(submenu);
        self
    }
}

fn nav_item(link: NavLink, fallback_label: String) -> AnyView {
    match link.submenu {
        None => view! {
            <li><a href=link.href>{link.label}</a></li>
        }
        .into_any(),
        Some(sub) => view! {
            <li class="dropdown">
                <a class="has-submenu" href=link.href.clone()>{link.label}</a>
                <button class="submenu-toggle" aria-expanded="false" aria-label="Expand submenu">
                    "▾"
                </button>
                <ul
                    class="dropdown-menu"
                    data-source=sub.source
                    data-item-selector=sub.item_selector
                    data-title-selector=sub.title_selector
                    data-max-items=sub.max_items.map(|n| n.to_string())
                >
                    <li><a href=link.href>{fallback_label}</a></li>
                </ul>
            </li>
        }
        .into_any(),
    }
}

/// Header bar, drawer, backdrop and submenu lists
///
/// Initializes the widget with `config` once mounted, so the emitted ids
/// and the widget agree; repeated mounts only re-run the page passes.
#[component]
pub fn SiteHeader(
    #[prop(into)] brand: String,
    #[prop(into, default = "index.html".to_string())] home_href: String,
    links: Vec<NavLink>,
    #[prop(optional)] config: Option<NavConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let fallback_label = config.submenu.fallback_label.clone();

    let init_config = config.clone();
    Effect::new(move |_| crate::entry::init_header_with(init_config.clone()));

    view! {
        <header id=config.ids.theme_bar class="site-header">
            <a class="brand" href=home_href>{brand}</a>
            <button
                id=config.ids.toggle
                class="menu-toggle"
                aria-expanded="false"
                aria-controls=config.ids.nav.clone()
                aria-label="Open menu"
            >
                <span class="menu-icon">"☰"</span>
            </button>
            <nav id=config.ids.nav aria-label="Primary">
                <button class="drawer-close" aria-label="Close menu">"×"</button>
                <ul class="nav-links">
                    {links
                        .into_iter()
                        .map(|link| nav_item(link, fallback_label.clone()))
                        .collect_view()}
                </ul>
            </nav>
            <div id=config.ids.backdrop class="backdrop"></div>
        </header>
    }
}
