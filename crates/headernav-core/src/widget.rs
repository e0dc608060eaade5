//! Header widget: event routing over the drawer, accordion and theme

use crate::active_link;
use crate::config::NavConfig;
use crate::dom::{HeaderDom, NavElements};
use crate::event::{CloseReason, EventBus, NavEvent};
use crate::focus::Key;
use crate::state::NavState;
use crate::theme::{self, NavTheme};
use crate::viewport;
use tracing::debug;

/// DOM interaction delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderEvent<N> {
    /// Delegated document click; `target` is the innermost clicked element
    Click { target: N },
    KeyDown { key: Key, shift: bool },
    Resize,
    Scroll,
}

/// What the host should do with the native event afterwards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub prevent_default: bool,
}

impl EventResponse {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn prevented() -> Self {
        Self {
            prevent_default: true,
        }
    }
}

/// The navigation widget for one loaded page
pub struct HeaderWidget<D: HeaderDom> {
    pub(crate) dom: D,
    pub(crate) config: NavConfig,
    pub(crate) state: NavState<D::Node>,
    pub(crate) bus: EventBus,
    theme: Option<NavTheme>,
}

impl<D: HeaderDom> HeaderWidget<D> {
    pub fn new(dom: D, config: NavConfig) -> Self {
        Self::with_bus(dom, config, EventBus::default_capacity())
    }

    pub fn with_bus(dom: D, config: NavConfig, bus: EventBus) -> Self {
        Self {
            dom,
            config,
            state: NavState::new(),
            bus,
            theme: None,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn state(&self) -> &NavState<D::Node> {
        &self.state
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub(crate) fn elements(&self) -> NavElements<D::Node> {
        NavElements::resolve(&self.dom, &self.config)
    }

    pub(crate) fn is_narrow(&self) -> bool {
        viewport::is_narrow(&self.dom, self.config.breakpoint_px)
    }

    /// Route one host event
    pub fn handle(&mut self, event: &HeaderEvent<D::Node>) -> EventResponse {
        match event {
            HeaderEvent::Click { target } => self.on_click(target),
            HeaderEvent::KeyDown { key, shift } => match key {
                Key::Escape => {
                    self.on_escape();
                    EventResponse::ignored()
                }
                Key::Tab => self.on_tab(*shift),
                Key::Other => EventResponse::ignored(),
            },
            HeaderEvent::Resize => {
                self.on_resize();
                EventResponse::ignored()
            }
            HeaderEvent::Scroll => {
                self.refresh_theme();
                EventResponse::ignored()
            }
        }
    }

    /// Delegated click routing: toggle, backdrop, close control, submenu trigger
    fn on_click(&mut self, target: &D::Node) -> EventResponse {
        let els = self.elements();
        let Some((_, backdrop)) = els.drawer_parts() else {
            return EventResponse::ignored();
        };
        let narrow = self.is_narrow();

        let toggle_selector = format!("#{}", self.config.ids.toggle);
        if self.dom.closest(target, &toggle_selector).is_some() {
            if !narrow {
                return EventResponse::ignored();
            }
            self.toggle_drawer();
            return EventResponse::prevented();
        }

        if *target == backdrop {
            if narrow {
                self.close_drawer(CloseReason::Backdrop);
            }
            return EventResponse::ignored();
        }

        if self
            .dom
            .closest(target, &self.config.selectors.drawer_close)
            .is_some()
        {
            if !narrow {
                return EventResponse::ignored();
            }
            self.close_drawer(CloseReason::CloseButton);
            return EventResponse::prevented();
        }

        if let Some(trigger) = self
            .dom
            .closest(target, &self.config.selectors.submenu_trigger)
        {
            // wide layouts: hover/CSS owns submenu visibility
            if !narrow {
                return EventResponse::ignored();
            }
            self.toggle_submenu(&trigger);
            return EventResponse::prevented();
        }

        EventResponse::ignored()
    }

    fn on_escape(&mut self) {
        if self.state.is_drawer_open() {
            self.close_drawer(CloseReason::Escape);
        }
    }

    fn on_resize(&mut self) {
        if !self.is_narrow() && self.state.is_drawer_open() {
            debug!("viewport widened past breakpoint, closing drawer");
            self.close_drawer(CloseReason::Resize);
        }
        self.refresh_theme();
    }

    /// Recompute the scroll theme; publishes only when it flips
    pub fn refresh_theme(&mut self) -> Option<NavTheme> {
        let els = self.elements();
        let theme = theme::apply_theme(&self.dom, &els, &self.config)?;
        if self.theme != Some(theme) {
            self.theme = Some(theme);
            self.bus.publish(NavEvent::ThemeChanged(theme));
        }
        Some(theme)
    }

    /// Mark nav links pointing at the current page
    pub fn mark_active_links(&self, page_path: &str) -> usize {
        let Some(nav) = self.dom.element_by_id(&self.config.ids.nav) else {
            return 0;
        };
        let count = active_link::mark_active_links(&self.dom, &nav, page_path, &self.config);
        self.bus.publish(NavEvent::ActiveLinksMarked { count });
        count
    }

    /// One-shot passes run by every initialization request
    pub fn run_page_passes(&mut self, page_path: &str) {
        let marked = self.mark_active_links(page_path);
        let theme = self.refresh_theme();
        debug!(marked, ?theme, "header page passes done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    const PAGE: &str = r##"
        <header id="navbar">
          <button id="menu-toggle" aria-expanded="false"><span class="icon">=</span></button>
          <nav id="primary-nav">
            <button class="drawer-close">x</button>
            <a href="index.html">Home</a>
            <a href="about.html">About</a>
          </nav>
          <div id="backdrop"></div>
        </header>
        <section class="hero"></section>
        <p id="content">Body</p>
    "##;

    fn widget(width: f64) -> HeaderWidget<MemoryDom> {
        let dom = MemoryDom::from_html(PAGE);
        dom.set_viewport_width(width);
        HeaderWidget::new(dom, NavConfig::default())
    }

    fn click(w: &mut HeaderWidget<MemoryDom>, selector: &str) -> EventResponse {
        let target = w.dom().query(None, selector).unwrap();
        w.handle(&HeaderEvent::Click { target })
    }

    #[test]
    fn test_click_on_toggle_child_opens() {
        let mut w = widget(400.0);
        let response = click(&mut w, ".icon");
        assert!(response.prevent_default);
        assert!(w.state().is_drawer_open());
    }

    #[test]
    fn test_toggle_inert_on_wide() {
        let mut w = widget(1200.0);
        let response = click(&mut w, "#menu-toggle");
        assert!(!response.prevent_default);
        assert!(!w.state().is_drawer_open());
    }

    #[test]
    fn test_backdrop_and_close_button() {
        let mut w = widget(400.0);
        click(&mut w, "#menu-toggle");
        click(&mut w, "#backdrop");
        assert!(!w.state().is_drawer_open());

        click(&mut w, "#menu-toggle");
        let response = click(&mut w, ".drawer-close");
        assert!(response.prevent_default);
        assert!(!w.state().is_drawer_open());
    }

    #[test]
    fn test_unrelated_click_ignored() {
        let mut w = widget(400.0);
        click(&mut w, "#menu-toggle");
        let response = click(&mut w, "#content");
        assert!(!response.prevent_default);
        assert!(w.state().is_drawer_open());
    }

    #[test]
    fn test_missing_backdrop_disables_drawer() {
        let dom = MemoryDom::from_html(
            r#"<button id="menu-toggle"></button><nav id="primary-nav"></nav>"#,
        );
        dom.set_viewport_width(400.0);
        let mut w = HeaderWidget::new(dom, NavConfig::default());
        let response = click(&mut w, "#menu-toggle");
        assert_eq!(response, EventResponse::ignored());
        assert!(!w.state().is_drawer_open());
    }

    #[test]
    fn test_scroll_publishes_theme_once() {
        let mut w = widget(1200.0);
        let mut rx = w.events().subscribe();
        let hero = w.dom().query(None, ".hero").unwrap();
        w.dom().set_bounding_bottom(&hero, 200.0);

        w.handle(&HeaderEvent::Scroll);
        w.handle(&HeaderEvent::Scroll);
        w.dom().set_bounding_bottom(&hero, -10.0);
        w.handle(&HeaderEvent::Scroll);

        assert_eq!(rx.try_recv().unwrap(), NavEvent::ThemeChanged(NavTheme::Dark));
        assert_eq!(rx.try_recv().unwrap(), NavEvent::ThemeChanged(NavTheme::Light));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_page_passes_mark_active() {
        let mut w = widget(1200.0);
        w.run_page_passes("/about.html");
        let about = w.dom().query(None, "a[href=\"about.html\"]").unwrap();
        assert!(w.dom().has_class(&about, "active"));
    }
}
