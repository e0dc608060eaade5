//! Versioned submenu cache
//!
//! Entries never expire on their own. Bumping `cache.version` changes every
//! key, which is the only invalidation mechanism; old-version keys are left
//! behind until [`SubmenuCache::prune_stale`] removes them.

use super::spec::{version_prefix, SubmenuItem, SubmenuSpec};
use crate::config::CacheConfig;
use crate::error::NavError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use url::Url;

/// Key/value string storage (localStorage, a JSON file, memory)
pub trait CacheStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), NavError>;
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), NavError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

/// Typed view over a [`CacheStore`] for submenu item lists
pub struct SubmenuCache<'a> {
    store: &'a dyn CacheStore,
    config: &'a CacheConfig,
}

impl<'a> SubmenuCache<'a> {
    pub fn new(store: &'a dyn CacheStore, config: &'a CacheConfig) -> Self {
        Self { store, config }
    }

    /// Cached items, or `None` on a miss
    ///
    /// A malformed or empty entry is removed and reported as a miss.
    pub fn get(&self, spec: &SubmenuSpec, resolved: &Url) -> Option<Vec<SubmenuItem>> {
        let key = spec.cache_key(self.config, resolved);
        let raw = self.store.read(&key)?;

        match serde_json::from_str::<Vec<SubmenuItem>>(&raw) {
            Ok(items) if !items.is_empty() => Some(items),
            Ok(_) => {
                debug!(key = %key, "discarding empty cache entry");
                self.store.remove(&key);
                None
            }
            Err(source) => {
                let err = NavError::CacheDecode {
                    key: key.clone(),
                    source,
                };
                warn!(error = %err, "discarding malformed cache entry");
                self.store.remove(&key);
                None
            }
        }
    }

    pub fn put(
        &self,
        spec: &SubmenuSpec,
        resolved: &Url,
        items: &[SubmenuItem],
    ) -> Result<(), NavError> {
        let key = spec.cache_key(self.config, resolved);
        let value = serde_json::to_string(items).map_err(|source| NavError::CacheEncode {
            key: key.clone(),
            source,
        })?;
        self.store.write(&key, &value)
    }

    /// Remove entries written under any other cache version
    pub fn prune_stale(&self) -> usize {
        let family = format!("{}:v", self.config.prefix);
        let current = version_prefix(self.config);
        let stale: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&family) && !k.starts_with(&current))
            .collect();

        for key in &stale {
            self.store.remove(key);
        }
        if !stale.is_empty() {
            debug!(
                removed = stale.len(),
                version = self.config.version,
                "pruned stale submenu cache entries"
            );
        }
        stale.len()
    }

    /// Remove every submenu entry regardless of version
    pub fn clear(&self) -> usize {
        let family = format!("{}:v", self.config.prefix);
        let keys: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&family))
            .collect();
        for key in &keys {
            self.store.remove(key);
        }
        keys.len()
    }
}
