//! Page entry point: idempotent `initHeader` and global listener wiring
//!
//! The first call claims [`HEADER_INIT`], builds the widget and installs the
//! document/window listeners. Every call, including the ones triggered by
//! the ready event, re-runs the page passes and populates any dynamic list
//! that is still unpopulated.

use crate::dom::WebDom;
use crate::events;
use crate::fetch::GlooFetcher;
use crate::storage::LocalStorageCache;
use headernav_core::focus::Key;
use headernav_core::submenu::SubmenuCache;
use headernav_core::{
    populate_submenus, CacheStore, HeaderEvent, HeaderWidget, NavConfig, SubmenuBuilder,
    HEADER_INIT,
};
use std::cell::RefCell;
use tracing::{debug, info, warn};
use url::Url;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, KeyboardEvent, MouseEvent};

/// Id of the optional inline JSON configuration block
pub const CONFIG_SCRIPT_ID: &str = "headernav-config";

thread_local! {
    static WIDGET: RefCell<Option<HeaderWidget<WebDom>>> = const { RefCell::new(None) };
}

fn with_widget<R>(f: impl FnOnce(&mut HeaderWidget<WebDom>) -> R) -> Option<R> {
    WIDGET.with(|cell| {
        let mut slot = cell.try_borrow_mut().ok()?;
        slot.as_mut().map(f)
    })
}

/// Inline JSON config, defaults when absent or invalid
pub fn load_config(dom: &WebDom) -> NavConfig {
    let Some(text) = dom
        .document()
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|script| script.text_content())
    else {
        return NavConfig::default();
    };

    match NavConfig::from_json_str(&text) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "invalid headernav config, using defaults");
            NavConfig::default()
        }
    }
}

/// Idempotent initialization, callable any number of times
///
/// The first call reads the inline JSON block with id [`CONFIG_SCRIPT_ID`].
#[wasm_bindgen(js_name = initHeader)]
pub fn init_header() {
    init(load_config);
}

/// Like [`init_header`], but the first call uses `config` instead of the
/// inline block
///
/// An invalid config falls back to defaults. Once the widget exists, later
/// calls only re-run the page passes and `config` is ignored.
pub fn init_header_with(config: NavConfig) {
    init(move |_| checked_config(config));
}

fn checked_config(config: NavConfig) -> NavConfig {
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!(error = %e, "invalid headernav config, using defaults");
            NavConfig::default()
        }
    }
}

fn init(config: impl FnOnce(&WebDom) -> NavConfig) {
    let Some(dom) = WebDom::from_window() else {
        return;
    };

    if HEADER_INIT.claim() {
        let widget = HeaderWidget::new(dom.clone(), config(&dom));
        events::spawn_bridge(widget.events(), dom.document().clone());
        prune_stale_cache(&dom, widget.config());
        WIDGET.with(|cell| *cell.borrow_mut() = Some(widget));
        wire_listeners(&dom);
        info!("header listeners installed");
    }

    run_page_passes(&dom);
}

fn prune_stale_cache(dom: &WebDom, config: &NavConfig) {
    if !config.cache.enabled {
        return;
    }
    if let Some(store) = LocalStorageCache::from_window(dom.window()) {
        SubmenuCache::new(&store, &config.cache).prune_stale();
    }
}

fn run_page_passes(dom: &WebDom) {
    let path = dom.page_path();
    let Some((config, bus)) = with_widget(|w| {
        w.run_page_passes(&path);
        (w.config().clone(), w.events().clone())
    }) else {
        return;
    };

    let Ok(base) = Url::parse(&dom.page_url()) else {
        warn!("page URL unavailable, dynamic submenus skipped");
        return;
    };

    let dom = dom.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let fetcher = GlooFetcher::new(base.clone());
        let store = LocalStorageCache::from_window(dom.window());
        let mut builder = SubmenuBuilder::new(&fetcher, &base, &config);
        if let Some(store) = &store {
            builder = builder.with_cache(store as &dyn CacheStore);
        }
        let outcomes = populate_submenus(&dom, &builder, &bus).await;
        if !outcomes.is_empty() {
            let fallbacks = outcomes.iter().filter(|o| o.is_fallback()).count();
            debug!(lists = outcomes.len(), fallbacks, "dynamic submenus populated");
        }
    });
}

fn listen<E: FromWasmAbi + 'static>(
    target: &EventTarget,
    name: &str,
    handler: impl FnMut(E) + 'static,
) {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
    {
        warn!(event = name, error = ?e, "failed to add listener");
    }
    // listeners live for the page lifetime
    callback.forget();
}

fn wire_listeners(dom: &WebDom) {
    let document: &EventTarget = dom.document().as_ref();
    let window: &EventTarget = dom.window().as_ref();

    listen(document, "click", |e: MouseEvent| {
        let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let response = with_widget(|w| w.handle(&HeaderEvent::Click { target }));
        if response.is_some_and(|r| r.prevent_default) {
            e.prevent_default();
        }
    });

    listen(window, "keydown", |e: KeyboardEvent| {
        let key = Key::from_dom_key(&e.key());
        if key == Key::Other {
            return;
        }
        let shift = e.shift_key();
        let response = with_widget(|w| w.handle(&HeaderEvent::KeyDown { key, shift }));
        if response.is_some_and(|r| r.prevent_default) {
            e.prevent_default();
        }
    });

    listen(window, "resize", |_: web_sys::Event| {
        with_widget(|w| w.handle(&HeaderEvent::Resize));
    });

    listen(window, "scroll", |_: web_sys::Event| {
        with_widget(|w| w.handle(&HeaderEvent::Scroll));
    });

    let ready_event = with_widget(|w| w.config().ready_event.clone()).unwrap_or_default();
    if !ready_event.is_empty() {
        listen(document, &ready_event, |_: web_sys::Event| init_header());
    }
}

/// Module start: console logging, then a first initialization attempt
#[wasm_bindgen(start)]
pub fn start() {
    crate::logging::init("info");
    init_header();
}
