//! Per-page navigation state

use std::collections::BTreeSet;

/// Accordion group identity: position of the group among the nav
/// container's groups in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmenuId(pub usize);

impl std::fmt::Display for SubmenuId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "submenu-{}", self.0)
    }
}

/// Drawer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

/// Mutable widget state, exclusively owned by one widget instance
///
/// Invariant: while the drawer is closed, no submenu is open.
#[derive(Debug, Clone, PartialEq)]
pub struct NavState<N> {
    drawer: DrawerState,
    open_submenus: BTreeSet<SubmenuId>,
    last_focused: Option<N>,
    saved_body_overflow: String,
}

impl<N> Default for NavState<N> {
    fn default() -> Self {
        Self {
            drawer: DrawerState::Closed,
            open_submenus: BTreeSet::new(),
            last_focused: None,
            saved_body_overflow: String::new(),
        }
    }
}

impl<N: Clone> NavState<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawer(&self) -> DrawerState {
        self.drawer
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer == DrawerState::Open
    }

    pub fn open_submenus(&self) -> &BTreeSet<SubmenuId> {
        &self.open_submenus
    }

    pub fn is_submenu_open(&self, id: SubmenuId) -> bool {
        self.open_submenus.contains(&id)
    }

    pub fn last_focused(&self) -> Option<&N> {
        self.last_focused.as_ref()
    }

    pub fn saved_body_overflow(&self) -> &str {
        &self.saved_body_overflow
    }

    /// Record the open transition
    pub(crate) fn mark_open(&mut self, saved_overflow: String, focused: Option<N>) {
        self.drawer = DrawerState::Open;
        self.saved_body_overflow = saved_overflow;
        self.last_focused = focused;
    }

    /// Reset to the closed form; returns what must be restored
    pub(crate) fn mark_closed(&mut self) -> (String, Option<N>) {
        self.drawer = DrawerState::Closed;
        self.open_submenus.clear();
        (
            std::mem::take(&mut self.saved_body_overflow),
            self.last_focused.take(),
        )
    }

    /// Flip one group; refused while the drawer is closed
    pub(crate) fn toggle_submenu(&mut self, id: SubmenuId) -> Option<bool> {
        if !self.is_drawer_open() {
            return None;
        }
        if self.open_submenus.remove(&id) {
            Some(false)
        } else {
            self.open_submenus.insert(id);
            Some(true)
        }
    }

    /// `drawer closed ⇒ no open submenus`
    pub fn invariant_holds(&self) -> bool {
        self.is_drawer_open() || self.open_submenus.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_refused_while_closed() {
        let mut state: NavState<u32> = NavState::new();
        assert_eq!(state.toggle_submenu(SubmenuId(0)), None);
        assert!(state.open_submenus().is_empty());
    }

    #[test]
    fn test_close_resets_everything() {
        let mut state: NavState<u32> = NavState::new();
        state.mark_open("scroll".to_string(), Some(42));
        assert_eq!(state.toggle_submenu(SubmenuId(1)), Some(true));
        assert_eq!(state.toggle_submenu(SubmenuId(2)), Some(true));
        assert_eq!(state.toggle_submenu(SubmenuId(1)), Some(false));
        assert!(state.is_submenu_open(SubmenuId(2)));

        let (overflow, focused) = state.mark_closed();
        assert_eq!(overflow, "scroll");
        assert_eq!(focused, Some(42));
        assert_eq!(state, NavState::new());
        assert!(state.invariant_holds());
    }

    #[test]
    fn test_submenu_id_display() {
        assert_eq!(SubmenuId(3).to_string(), "submenu-3");
    }
}
