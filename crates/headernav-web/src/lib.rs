//! headernav-web - Browser binding for headernav
//!
//! Implements the core DOM, fetch and cache seams over `web-sys`,
//! `gloo-net` and `localStorage`, exports the idempotent `initHeader`
//! entry point, and provides a Leptos `SiteHeader` component.

pub mod components;
pub mod dom;
pub mod entry;
pub mod events;
pub mod fetch;
pub mod logging;
pub mod storage;

pub use components::{DynamicSubmenu, NavLink, SiteHeader};
pub use dom::WebDom;
pub use entry::{init_header, init_header_with};
pub use fetch::GlooFetcher;
pub use storage::LocalStorageCache;
