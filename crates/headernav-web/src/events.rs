//! Re-dispatch of widget events as `headernav:*` DOM custom events

use headernav_core::{EventBus, NavEvent};
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use web_sys::{CustomEvent, CustomEventInit, Document};

pub const EVENT_PREFIX: &str = "headernav:";

/// JSON `detail` payload for an event
pub fn event_detail(event: &NavEvent) -> Value {
    match event {
        NavEvent::DrawerOpened => json!({}),
        NavEvent::DrawerClosed { reason } => json!({ "reason": reason.as_str() }),
        NavEvent::SubmenuToggled { id, open } => json!({ "submenu": id.0, "open": open }),
        NavEvent::SubmenuPopulated {
            source,
            items,
            fallback,
        } => json!({ "source": source, "items": items, "fallback": fallback }),
        NavEvent::ThemeChanged(theme) => json!({ "theme": theme }),
        NavEvent::ActiveLinksMarked { count } => json!({ "count": count }),
    }
}

pub fn dom_event_name(event: &NavEvent) -> String {
    format!("{EVENT_PREFIX}{}", event.name())
}

fn dispatch(document: &Document, event: &NavEvent) {
    let init = CustomEventInit::new();
    if let Ok(detail) = js_sys::JSON::parse(&event_detail(event).to_string()) {
        init.set_detail(&detail);
    }
    match CustomEvent::new_with_event_init_dict(&dom_event_name(event), &init) {
        Ok(custom) => {
            let _ = document.dispatch_event(&custom);
        }
        Err(e) => warn!(event = event.name(), error = ?e, "failed to create custom event"),
    }
}

/// Forward every bus event to `document` until the bus closes
pub fn spawn_bridge(bus: &EventBus, document: Document) {
    let mut rx = bus.subscribe();
    wasm_bindgen_futures::spawn_local(async move {
        loop {
            match rx.recv().await {
                Ok(event) => dispatch(&document, &event),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "event bridge lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
