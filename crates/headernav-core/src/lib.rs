//! headernav-core - Core library for headernav
//!
//! Provides the drawer state machine, submenu accordion, focus trap,
//! scroll theme, active-link marker and the dynamic submenu builder, all
//! over an abstract DOM so they run in the browser and headlessly.

mod accordion;
pub mod active_link;
pub mod config;
pub mod dom;
mod drawer;
pub mod error;
pub mod event;
pub mod focus;
pub mod init;
pub mod state;
pub mod submenu;
pub mod theme;
pub mod viewport;
pub mod widget;

pub use config::NavConfig;
pub use dom::{HeaderDom, MemoryDom, NavElements};
pub use error::{NavError, SubmenuOutcome};
pub use event::{CloseReason, EventBus, NavEvent};
pub use init::{InitFlag, HEADER_INIT};
pub use state::{DrawerState, NavState, SubmenuId};
pub use submenu::{
    populate_submenus, CacheStore, MemoryCache, PageFetcher, SubmenuBuilder, SubmenuItem,
    SubmenuSpec,
};
pub use theme::NavTheme;
pub use widget::{EventResponse, HeaderEvent, HeaderWidget};
