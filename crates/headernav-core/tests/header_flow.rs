//! End-to-end header flows over the headless DOM

use headernav_core::dom::NodeId;
use headernav_core::focus::Key;
use headernav_core::{
    populate_submenus, CloseReason, EventBus, HeaderDom, HeaderEvent, HeaderWidget, MemoryCache,
    MemoryDom, NavConfig, NavError, NavEvent, NavState, PageFetcher, SubmenuBuilder,
    SubmenuOutcome,
};
use std::cell::Cell;
use url::Url;

const HEADER: &str = r##"
    <header id="navbar">
      <a id="logo" href="index.html">Site</a>
      <button id="menu-toggle" aria-expanded="false">Menu</button>
      <nav id="primary-nav">
        <button class="drawer-close">x</button>
        <ul>
          <li><a href="index.html">Home</a></li>
          <li class="dropdown">
            <a class="has-submenu" href="products.html">Products</a>
            <button class="submenu-toggle" aria-expanded="false">v</button>
            <ul class="dropdown-menu" data-source="products.html" data-max-items="5">
              <li>Loading</li>
            </ul>
          </li>
          <li class="dropdown">
            <a class="has-submenu" href="guides.html">Guides</a>
            <button class="submenu-toggle" aria-expanded="false">v</button>
            <ul class="dropdown-menu" data-source="guides.html"><li>Loading</li></ul>
          </li>
          <li><a href="#contact">Contact</a></li>
        </ul>
      </nav>
      <div id="backdrop"></div>
    </header>
    <section class="hero"></section>
"##;

struct PageServer {
    calls: Cell<usize>,
}

impl PageFetcher for PageServer {
    async fn fetch_text(&self, url: &Url) -> Result<String, NavError> {
        self.calls.set(self.calls.get() + 1);
        match url.path() {
            "/products.html" => Ok((1..=9)
                .map(|i| format!("<article><h2>Product {i}</h2></article>"))
                .collect()),
            _ => Err(NavError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn narrow_widget() -> HeaderWidget<MemoryDom> {
    let dom = MemoryDom::from_html(HEADER);
    dom.set_viewport_width(400.0);
    HeaderWidget::new(dom, NavConfig::default())
}

fn all(w: &HeaderWidget<MemoryDom>, selector: &str) -> Vec<NodeId> {
    w.dom().query_all(None, selector)
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Open,
    Close,
    Toggle(usize),
    Widen,
    Narrow,
    Escape,
}

const STEPS: [Step; 7] = [
    Step::Open,
    Step::Close,
    Step::Toggle(0),
    Step::Toggle(1),
    Step::Widen,
    Step::Narrow,
    Step::Escape,
];

fn apply(w: &mut HeaderWidget<MemoryDom>, step: Step) {
    match step {
        Step::Open => {
            w.open_drawer();
        }
        Step::Close => {
            w.close_drawer(CloseReason::Programmatic);
        }
        Step::Toggle(i) => {
            let target = all(w, ".submenu-toggle")[i];
            w.handle(&HeaderEvent::Click { target });
        }
        Step::Widen => {
            w.dom().set_viewport_width(1200.0);
            w.handle(&HeaderEvent::Resize);
        }
        Step::Narrow => {
            w.dom().set_viewport_width(400.0);
            w.handle(&HeaderEvent::Resize);
        }
        Step::Escape => {
            w.handle(&HeaderEvent::KeyDown {
                key: Key::Escape,
                shift: false,
            });
        }
    }
}

#[test]
fn test_invariant_over_all_short_sequences() {
    let n = STEPS.len();
    for code in 0..n.pow(4) {
        let mut w = narrow_widget();
        let mut rest = code;
        let mut trail = Vec::new();
        for _ in 0..4 {
            let step = STEPS[rest % n];
            rest /= n;
            trail.push(step);
            apply(&mut w, step);
            assert!(
                w.state().invariant_holds(),
                "invariant broken after {trail:?}"
            );
            if !w.state().is_drawer_open() {
                for group in all(&w, ".dropdown") {
                    assert!(!w.dom().has_class(&group, "open"), "after {trail:?}");
                }
            }
        }
    }
}

#[test]
fn test_narrow_to_wide_resize_clears_everything() {
    let mut w = narrow_widget();
    let toggle = all(&w, "#menu-toggle")[0];
    w.handle(&HeaderEvent::Click { target: toggle });
    for chevron in all(&w, ".submenu-toggle") {
        w.handle(&HeaderEvent::Click { target: chevron });
    }
    assert_eq!(w.state().open_submenus().len(), 2);

    w.dom().set_viewport_width(1200.0);
    w.handle(&HeaderEvent::Resize);

    assert!(!w.state().is_drawer_open());
    assert!(w.state().open_submenus().is_empty());
    assert_eq!(w.state(), &NavState::new());
}

#[test]
fn test_open_close_round_trip_restores_page() {
    let mut w = narrow_widget();
    let logo = all(&w, "#logo")[0];
    w.dom().set_body_overflow("scroll");
    w.dom().focus(&logo);

    let toggle = all(&w, "#menu-toggle")[0];
    w.handle(&HeaderEvent::Click { target: toggle });
    assert_eq!(w.dom().body_overflow(), "hidden");
    w.handle(&HeaderEvent::Click { target: toggle });

    assert_eq!(w.state(), &NavState::new());
    assert_eq!(w.dom().body_overflow(), "scroll");
    assert_eq!(w.dom().active_element(), Some(logo));
}

#[tokio::test]
async fn test_page_load_flow() {
    let mut w = narrow_widget();
    let bus: EventBus = w.events().clone();
    let mut rx = bus.subscribe();

    w.run_page_passes("/site/products.html");
    let active = all(&w, "a.active");
    assert_eq!(active.len(), 1);

    let server = PageServer {
        calls: Cell::new(0),
    };
    let base = Url::parse("https://example.com/site/products.html").unwrap();
    let store = MemoryCache::new();
    let config = w.config().clone();
    let builder = SubmenuBuilder::new(&server, &base, &config).with_cache(&store);

    let outcomes = populate_submenus(w.dom(), &builder, &bus).await;
    assert_eq!(outcomes[0], SubmenuOutcome::Fetched { count: 5 });
    assert!(outcomes[1].is_fallback());

    let lists = all(&w, "[data-source]");
    let products: Vec<String> = w
        .dom()
        .query_all(Some(&lists[0]), "a")
        .iter()
        .filter_map(|a| w.dom().attribute(a, "href"))
        .collect();
    assert_eq!(
        products,
        vec![
            "products.html#item-1",
            "products.html#item-2",
            "products.html#item-3",
            "products.html#item-4",
            "products.html#item-5",
        ]
    );
    let guides = w.dom().query_all(Some(&lists[1]), "a");
    assert_eq!(guides.len(), 1);
    assert_eq!(
        w.dom().inner_html(&lists[1]),
        r#"<li><a href="guides.html">View all</a></li>"#
    );

    // a later header:ready re-runs passes without refetching
    w.run_page_passes("/site/products.html");
    let again = populate_submenus(w.dom(), &builder, &bus).await;
    assert!(again.is_empty());
    assert_eq!(server.calls.get(), 2);

    let mut names = Vec::new();
    while let Ok(event) = rx.try_recv() {
        names.push(event.name());
    }
    assert!(names.contains(&"active-links"));
    assert!(names.contains(&"theme-change"));
    assert_eq!(names.iter().filter(|n| **n == "submenu-populated").count(), 2);
    assert!(!names.contains(&NavEvent::DrawerOpened.name()));
}
