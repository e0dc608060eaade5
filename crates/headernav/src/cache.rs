//! JSON file cache store for the CLI
//!
//! One file, `<cache_dir>/submenu-cache.json`, holding every key with the
//! time it was written. Writes go straight to disk so concurrent previews
//! see each other's entries (last write wins).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use headernav_core::{CacheStore, NavError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CACHE_FILE: &str = "submenu-cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    entries: BTreeMap<String, CacheEntry>,
}

pub struct FileCache {
    path: PathBuf,
    state: Mutex<CacheFile>,
}

/// Default cache directory (`<platform cache dir>/headernav`)
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("headernav"))
}

impl FileCache {
    /// Open or create the cache file under `cache_dir`
    ///
    /// An unreadable or corrupt file is treated as empty and rewritten on
    /// the next write.
    pub fn open(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;
        let path = cache_dir.join(CACHE_FILE);

        let state = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "corrupt cache file, starting empty");
                CacheFile::default()
            }),
            Err(_) => CacheFile::default(),
        };
        debug!(path = %path.display(), entries = state.entries.len(), "cache opened");

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.state.lock().entries.get(key).cloned()
    }

    fn persist(&self, state: &CacheFile) -> Result<()> {
        let content =
            serde_json::to_string_pretty(state).context("Failed to serialize cache")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write cache: {}", self.path.display()))
    }

    /// Delete the cache file; returns its size if it existed
    pub fn remove_file(cache_dir: &Path) -> Result<Option<u64>> {
        let path = cache_dir.join(CACHE_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let size = std::fs::metadata(&path)
            .with_context(|| format!("Failed to read cache metadata: {}", path.display()))?
            .len();
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to delete cache: {}", path.display()))?;
        Ok(Some(size))
    }
}

impl CacheStore for FileCache {
    fn read(&self, key: &str) -> Option<String> {
        self.state.lock().entries.get(key).map(|e| e.value.clone())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), NavError> {
        let mut state = self.state.lock();
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                saved_at: Utc::now(),
            },
        );
        self.persist(&state).map_err(|e| NavError::CacheStore {
            key: key.to_string(),
            message: format!("{e:#}"),
        })
    }

    fn remove(&self, key: &str) {
        let mut state = self.state.lock();
        if state.entries.remove(key).is_some() {
            if let Err(e) = self.persist(&state) {
                warn!(key, error = %e, "failed to persist cache removal");
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.state.lock().entries.keys().cloned().collect()
    }
}
