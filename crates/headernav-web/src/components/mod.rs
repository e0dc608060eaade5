//! Leptos UI components

mod site_header;

pub use site_header::{DynamicSubmenu, NavLink, SiteHeader};
