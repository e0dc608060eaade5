//! Dynamic submenus
//!
//! Lists carrying `data-source` are filled with links scraped from another
//! page on the same site. Each list is an independent task: cache lookup,
//! fetch, extraction, rendering. Any failure renders a single "view all"
//! link to the source page instead, so a list never stays empty.

pub mod cache;
mod extract;
pub mod fetch;
mod render;
mod spec;

pub use cache::{CacheStore, MemoryCache, SubmenuCache};
pub use extract::{anchor_for, extract_items};
pub use fetch::{check_same_origin, resolve_source, PageFetcher};
pub use render::{escape_html, render_fallback, render_items};
pub use spec::{clamp_max_items, SubmenuItem, SubmenuSpec};

use crate::config::NavConfig;
use crate::dom::HeaderDom;
use crate::error::{NavError, SubmenuOutcome};
use crate::event::{EventBus, NavEvent};
use futures::future::join_all;
use tracing::{debug, warn};
use url::Url;

/// Markup and outcome for one list
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSubmenu {
    pub markup: String,
    pub items: Vec<SubmenuItem>,
    pub outcome: SubmenuOutcome,
}

/// Builds submenu content against one page URL
pub struct SubmenuBuilder<'a, F> {
    fetcher: &'a F,
    base: &'a Url,
    config: &'a NavConfig,
    cache: Option<SubmenuCache<'a>>,
}

impl<'a, F: PageFetcher> SubmenuBuilder<'a, F> {
    /// `base` is the URL of the page hosting the header
    pub fn new(fetcher: &'a F, base: &'a Url, config: &'a NavConfig) -> Self {
        Self {
            fetcher,
            base,
            config,
            cache: None,
        }
    }

    /// Consult and fill `store`, unless caching is disabled in the config
    pub fn with_cache(mut self, store: &'a dyn CacheStore) -> Self {
        let config = self.config;
        if config.cache.enabled {
            self.cache = Some(SubmenuCache::new(store, &config.cache));
        }
        self
    }

    pub fn config(&self) -> &NavConfig {
        self.config
    }

    /// Items for `spec` and whether they came from the cache
    pub async fn load(&self, spec: &SubmenuSpec) -> Result<(Vec<SubmenuItem>, bool), NavError> {
        let url = resolve_source(self.base, &spec.source)?;
        if let Some(cache) = &self.cache {
            if let Some(items) = cache.get(spec, &url) {
                debug!(%url, items = items.len(), "submenu cache hit");
                return Ok((items, true));
            }
            debug!(%url, "submenu cache miss");
        }

        let html = self.fetcher.fetch_text(&url).await?;
        let items = extract_items(&html, spec, &self.config.submenu.heading_fallback)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(spec, &url, &items) {
                warn!(source = %spec.source, error = %e, "failed to cache submenu");
            }
        }
        Ok((items, false))
    }

    /// Never fails: errors resolve to the fallback link
    pub async fn build(&self, spec: &SubmenuSpec) -> BuiltSubmenu {
        match self.load(spec).await {
            Ok((items, cached)) => {
                let count = items.len();
                BuiltSubmenu {
                    markup: render_items(&items),
                    items,
                    outcome: if cached {
                        SubmenuOutcome::Cached { count }
                    } else {
                        SubmenuOutcome::Fetched { count }
                    },
                }
            }
            Err(e) => {
                warn!(source = %spec.source, error = %e, "submenu unavailable, rendering fallback");
                BuiltSubmenu {
                    markup: render_fallback(&spec.source, &self.config.submenu.fallback_label),
                    items: Vec::new(),
                    outcome: SubmenuOutcome::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}

/// Dynamic lists inside the nav container that still need content
///
/// Populated and in-flight lists are skipped. Returned lists are marked
/// `aria-busy` until their content lands.
pub fn pending_lists<D: HeaderDom>(dom: &D, config: &NavConfig) -> Vec<(D::Node, SubmenuSpec)> {
    let Some(nav) = dom.element_by_id(&config.ids.nav) else {
        return Vec::new();
    };

    dom.query_all(Some(&nav), &config.selectors.dynamic_list)
        .into_iter()
        .filter(|list| {
            dom.attribute(list, "data-populated").as_deref() != Some("true")
                && dom.attribute(list, "aria-busy").as_deref() != Some("true")
        })
        .filter_map(|list| {
            let spec = SubmenuSpec::from_element(dom, &list, &config.submenu)?;
            dom.set_attribute(&list, "aria-busy", "true");
            Some((list, spec))
        })
        .collect()
}

/// Build one list and replace its content
pub async fn populate_submenu<D: HeaderDom, F: PageFetcher>(
    dom: &D,
    list: &D::Node,
    spec: &SubmenuSpec,
    builder: &SubmenuBuilder<'_, F>,
    bus: &EventBus,
) -> SubmenuOutcome {
    let built = builder.build(spec).await;

    dom.set_inner_html(list, &built.markup);
    dom.set_attribute(list, "data-populated", "true");
    dom.remove_attribute(list, "aria-busy");

    bus.publish(NavEvent::SubmenuPopulated {
        source: spec.source.clone(),
        items: built.outcome.item_count(),
        fallback: built.outcome.is_fallback(),
    });
    built.outcome
}

/// Populate every pending list concurrently
///
/// Each list is rendered as soon as its own task completes. Outcomes are
/// returned in document order.
pub async fn populate_submenus<D: HeaderDom, F: PageFetcher>(
    dom: &D,
    builder: &SubmenuBuilder<'_, F>,
    bus: &EventBus,
) -> Vec<SubmenuOutcome> {
    let lists = pending_lists(dom, builder.config());
    if lists.is_empty() {
        return Vec::new();
    }
    debug!(count = lists.len(), "populating dynamic submenus");

    let tasks = lists
        .into_iter()
        .map(|(list, spec)| async move { populate_submenu(dom, &list, &spec, builder, bus).await });
    join_all(tasks).await
}
