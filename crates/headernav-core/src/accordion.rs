//! Submenu accordion
//!
//! Each group opens and closes independently on narrow layouts. Closing the
//! drawer collapses all of them regardless of their individual state.

use crate::dom::HeaderDom;
use crate::event::NavEvent;
use crate::state::SubmenuId;
use crate::widget::HeaderWidget;
use tracing::debug;

impl<D: HeaderDom> HeaderWidget<D> {
    /// Flip the group owning `trigger`; returns the new open flag
    ///
    /// `None` when the viewport is wide at the moment of the interaction,
    /// when the trigger has no group inside the nav container, or when the
    /// drawer is closed.
    pub fn toggle_submenu(&mut self, trigger: &D::Node) -> Option<bool> {
        if !self.is_narrow() {
            return None;
        }
        let (id, group) = self.group_of(trigger)?;
        let open = self.state.toggle_submenu(id)?;

        let classes = &self.config.classes;
        let selectors = &self.config.selectors;
        if open {
            self.dom.add_class(&group, &classes.open);
        } else {
            self.dom.remove_class(&group, &classes.open);
        }
        if let Some(disclosure) = self.dom.query(Some(&group), &selectors.disclosure) {
            self.dom
                .set_attribute(&disclosure, "aria-expanded", if open { "true" } else { "false" });
        }
        if let Some(list) = self.dom.query(Some(&group), &selectors.group_list) {
            self.dom
                .set_style(&list, "display", if open { "block" } else { "none" });
        }

        debug!(submenu = %id, open, "submenu toggled");
        self.bus.publish(NavEvent::SubmenuToggled { id, open });
        Some(open)
    }

    /// Group identity: index among the nav container's groups
    fn group_of(&self, trigger: &D::Node) -> Option<(SubmenuId, D::Node)> {
        let nav = self.dom.element_by_id(&self.config.ids.nav)?;
        let group = self.dom.closest(trigger, &self.config.selectors.group)?;
        let index = self
            .dom
            .query_all(Some(&nav), &self.config.selectors.group)
            .iter()
            .position(|g| *g == group)?;
        Some((SubmenuId(index), group))
    }

    /// Reset every group's markup to collapsed
    pub(crate) fn collapse_groups(&self, nav: &D::Node) {
        let classes = &self.config.classes;
        let selectors = &self.config.selectors;

        for group in self.dom.query_all(Some(nav), &selectors.group) {
            self.dom.remove_class(&group, &classes.open);
        }
        for disclosure in self.dom.query_all(Some(nav), &selectors.disclosure) {
            if self.dom.attribute(&disclosure, "aria-expanded").as_deref() == Some("true") {
                self.dom.set_attribute(&disclosure, "aria-expanded", "false");
            }
        }
        for list in self.dom.query_all(Some(nav), &selectors.group_list) {
            self.dom.set_style(&list, "display", "");
        }
    }
}
