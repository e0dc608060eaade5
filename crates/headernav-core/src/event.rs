//! Event bus for headernav using tokio::broadcast
//!
//! Publishes widget transitions so hosts can observe them (the browser
//! binding re-dispatches them as DOM custom events).

use crate::state::SubmenuId;
use crate::theme::NavTheme;
use tokio::sync::broadcast;

/// Why the drawer closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Menu toggle activated while open
    Toggle,
    Backdrop,
    CloseButton,
    Escape,
    /// Viewport crossed from narrow to wide
    Resize,
    /// Host called `close_drawer` directly
    Programmatic,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Toggle => "toggle",
            CloseReason::Backdrop => "backdrop",
            CloseReason::CloseButton => "close-button",
            CloseReason::Escape => "escape",
            CloseReason::Resize => "resize",
            CloseReason::Programmatic => "programmatic",
        }
    }
}

/// Events emitted by the widget
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    DrawerOpened,
    DrawerClosed { reason: CloseReason },
    SubmenuToggled { id: SubmenuId, open: bool },
    /// A dynamic submenu finished rendering
    SubmenuPopulated {
        source: String,
        items: usize,
        fallback: bool,
    },
    ThemeChanged(NavTheme),
    ActiveLinksMarked { count: usize },
}

impl NavEvent {
    /// Stable name used for DOM custom events (`headernav:<name>`)
    pub fn name(&self) -> &'static str {
        match self {
            NavEvent::DrawerOpened => "drawer-open",
            NavEvent::DrawerClosed { .. } => "drawer-close",
            NavEvent::SubmenuToggled { .. } => "submenu-toggle",
            NavEvent::SubmenuPopulated { .. } => "submenu-populated",
            NavEvent::ThemeChanged(_) => "theme-change",
            NavEvent::ActiveLinksMarked { .. } => "active-links",
        }
    }
}

/// Event bus for broadcasting widget events
///
/// Uses tokio::broadcast for multi-consumer support.
pub struct EventBus {
    sender: broadcast::Sender<NavEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (64 events)
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: NavEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
