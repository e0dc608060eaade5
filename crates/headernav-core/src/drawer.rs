//! Drawer state machine
//!
//! `Closed -> Open` locks page scroll, remembers focus and moves it into the
//! nav container. `Open -> Closed` undoes all of that and collapses every
//! submenu. Both transitions are no-ops from their target state.

use crate::dom::HeaderDom;
use crate::event::{CloseReason, NavEvent};
use crate::focus::{self, TrapAction};
use crate::widget::{EventResponse, HeaderWidget};
use tracing::debug;

impl<D: HeaderDom> HeaderWidget<D> {
    /// Open the drawer; false if already open or the markup is missing
    pub fn open_drawer(&mut self) -> bool {
        if self.state.is_drawer_open() {
            return false;
        }
        let els = self.elements();
        let Some((nav, backdrop)) = els.drawer_parts() else {
            return false;
        };

        self.dom.add_class(&nav, &self.config.classes.open);
        self.dom
            .add_class(&backdrop, &self.config.classes.backdrop_visible);
        if let Some(toggle) = &els.toggle {
            self.dom.set_attribute(toggle, "aria-expanded", "true");
        }

        let saved_overflow = self.dom.body_overflow();
        self.dom.set_body_overflow("hidden");
        let focused = self.dom.active_element();
        self.state.mark_open(saved_overflow, focused);

        if let Some(first) = focus::focusable_descendants(&self.dom, &nav).first() {
            self.dom.focus(first);
        }

        debug!("drawer opened");
        self.bus.publish(NavEvent::DrawerOpened);
        true
    }

    /// Close the drawer; false if it was already closed
    pub fn close_drawer(&mut self, reason: CloseReason) -> bool {
        if !self.state.is_drawer_open() {
            return false;
        }
        let els = self.elements();
        let (saved_overflow, focused) = self.state.mark_closed();

        if let Some(nav) = &els.nav {
            self.dom.remove_class(nav, &self.config.classes.open);
            self.collapse_groups(nav);
        }
        if let Some(backdrop) = &els.backdrop {
            self.dom
                .remove_class(backdrop, &self.config.classes.backdrop_visible);
        }
        if let Some(toggle) = &els.toggle {
            self.dom.set_attribute(toggle, "aria-expanded", "false");
        }
        self.dom.set_body_overflow(&saved_overflow);

        if let Some(previous) = focused {
            if self.dom.can_receive_focus(&previous) {
                self.dom.focus(&previous);
            }
        }

        debug!(reason = reason.as_str(), "drawer closed");
        self.bus.publish(NavEvent::DrawerClosed { reason });
        true
    }

    /// Toggle control behavior
    pub fn toggle_drawer(&mut self) -> bool {
        if self.state.is_drawer_open() {
            self.close_drawer(CloseReason::Toggle);
            false
        } else {
            self.open_drawer()
        }
    }

    /// Focus trap, active only while the drawer is open
    pub(crate) fn on_tab(&mut self, shift: bool) -> EventResponse {
        if !self.state.is_drawer_open() {
            return EventResponse::ignored();
        }
        let Some(nav) = self.dom.element_by_id(&self.config.ids.nav) else {
            return EventResponse::ignored();
        };

        let focusables = focus::focusable_descendants(&self.dom, &nav);
        let current = self.dom.active_element();
        match focus::trap_tab(&focusables, current.as_ref(), shift) {
            TrapAction::Allow => EventResponse::ignored(),
            TrapAction::MoveTo(node) => {
                self.dom.focus(&node);
                EventResponse::prevented()
            }
            TrapAction::Hold => EventResponse::prevented(),
        }
    }

    /// Whether Tab presses are currently being trapped
    pub fn focus_trap_active(&self) -> bool {
        self.state.is_drawer_open()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::NavConfig;
    use crate::dom::{HeaderDom, MemoryDom};
    use crate::event::{CloseReason, NavEvent};
    use crate::focus::Key;
    use crate::state::NavState;
    use crate::widget::{HeaderEvent, HeaderWidget};

    const PAGE: &str = r##"
        <button id="menu-toggle" aria-expanded="false">Menu</button>
        <a id="skip" href="#main">Skip</a>
        <nav id="primary-nav">
          <button class="drawer-close">x</button>
          <a href="index.html">Home</a>
          <a id="last" href="contact.html">Contact</a>
        </nav>
        <div id="backdrop"></div>
    "##;

    fn widget() -> HeaderWidget<MemoryDom> {
        let dom = MemoryDom::from_html(PAGE);
        dom.set_viewport_width(400.0);
        dom.set_body_overflow("auto");
        HeaderWidget::new(dom, NavConfig::default())
    }

    fn node(w: &HeaderWidget<MemoryDom>, selector: &str) -> crate::dom::NodeId {
        w.dom().query(None, selector).unwrap()
    }

    #[test]
    fn test_open_effects() {
        let mut w = widget();
        let skip = node(&w, "#skip");
        w.dom().focus(&skip);

        assert!(w.open_drawer());

        let nav = node(&w, "#primary-nav");
        let backdrop = node(&w, "#backdrop");
        let toggle = node(&w, "#menu-toggle");
        let close = node(&w, ".drawer-close");
        assert!(w.dom().has_class(&nav, "open"));
        assert!(w.dom().has_class(&backdrop, "show"));
        assert_eq!(w.dom().attribute(&toggle, "aria-expanded").as_deref(), Some("true"));
        assert_eq!(w.dom().body_overflow(), "hidden");
        assert_eq!(w.state().saved_body_overflow(), "auto");
        assert_eq!(w.state().last_focused(), Some(&skip));
        assert_eq!(w.dom().active_element(), Some(close));
        assert!(w.focus_trap_active());
    }

    #[test]
    fn test_open_then_close_restores_initial_form() {
        let mut w = widget();
        let skip = node(&w, "#skip");
        w.dom().focus(&skip);

        w.open_drawer();
        assert!(w.close_drawer(CloseReason::Programmatic));

        assert_eq!(w.state(), &NavState::new());
        assert_eq!(w.dom().body_overflow(), "auto");
        assert_eq!(w.dom().active_element(), Some(skip));
        let toggle = node(&w, "#menu-toggle");
        assert_eq!(w.dom().attribute(&toggle, "aria-expanded").as_deref(), Some("false"));
        assert!(!w.focus_trap_active());
    }

    #[test]
    fn test_idempotent_transitions() {
        let mut w = widget();
        let mut rx = w.events().subscribe();

        assert!(!w.close_drawer(CloseReason::Programmatic));
        assert!(w.open_drawer());
        assert!(!w.open_drawer());
        assert_eq!(w.dom().body_overflow(), "hidden");
        assert_eq!(w.state().saved_body_overflow(), "auto");

        assert_eq!(rx.try_recv().unwrap(), NavEvent::DrawerOpened);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_focus_not_restored_to_detached_element() {
        let mut w = widget();
        let skip = node(&w, "#skip");
        w.dom().focus(&skip);
        w.open_drawer();
        w.dom().detach(&skip);

        w.close_drawer(CloseReason::Escape);
        assert_ne!(w.dom().active_element(), Some(skip));
    }

    #[test]
    fn test_escape_while_closed_has_no_effect() {
        let mut w = widget();
        let mut rx = w.events().subscribe();
        let before = w.dom().body_overflow();

        let response = w.handle(&HeaderEvent::KeyDown {
            key: Key::Escape,
            shift: false,
        });

        assert!(!response.prevent_default);
        assert_eq!(w.state(), &NavState::new());
        assert_eq!(w.dom().body_overflow(), before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_escape_closes_open_drawer() {
        let mut w = widget();
        w.open_drawer();
        w.handle(&HeaderEvent::KeyDown {
            key: Key::Escape,
            shift: false,
        });
        assert!(!w.state().is_drawer_open());
    }

    #[test]
    fn test_tab_wraps_inside_open_drawer() {
        let mut w = widget();
        w.open_drawer();
        let last = node(&w, "#last");
        let close = node(&w, ".drawer-close");

        w.dom().focus(&last);
        let response = w.handle(&HeaderEvent::KeyDown {
            key: Key::Tab,
            shift: false,
        });
        assert!(response.prevent_default);
        assert_eq!(w.dom().active_element(), Some(close));

        let response = w.handle(&HeaderEvent::KeyDown {
            key: Key::Tab,
            shift: true,
        });
        assert!(response.prevent_default);
        assert_eq!(w.dom().active_element(), Some(last));
    }

    #[test]
    fn test_tab_untouched_while_closed() {
        let mut w = widget();
        let response = w.handle(&HeaderEvent::KeyDown {
            key: Key::Tab,
            shift: false,
        });
        assert!(!response.prevent_default);
    }

    #[test]
    fn test_resize_to_wide_closes() {
        let mut w = widget();
        w.open_drawer();
        w.dom().set_viewport_width(1200.0);
        w.handle(&HeaderEvent::Resize);
        assert!(!w.state().is_drawer_open());
        assert_eq!(w.dom().body_overflow(), "auto");
    }

    #[test]
    fn test_resize_within_narrow_keeps_open() {
        let mut w = widget();
        w.open_drawer();
        w.dom().set_viewport_width(600.0);
        w.handle(&HeaderEvent::Resize);
        assert!(w.state().is_drawer_open());
    }
}
