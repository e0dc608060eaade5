//! `localStorage`-backed submenu cache store

use headernav_core::{CacheStore, NavError};
use web_sys::Storage;

pub struct LocalStorageCache {
    storage: Storage,
}

impl LocalStorageCache {
    /// `None` when storage is disabled (private mode, sandboxed frame)
    pub fn from_window(window: &web_sys::Window) -> Option<Self> {
        let storage = window.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl CacheStore for LocalStorageCache {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), NavError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| NavError::CacheStore {
                key: key.to_string(),
                message: format!("{e:?}"),
            })
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }

    fn keys(&self) -> Vec<String> {
        let len = self.storage.length().unwrap_or(0);
        (0..len)
            .filter_map(|i| self.storage.key(i).ok().flatten())
            .collect()
    }
}
