//! Error types for headernav-core
//!
//! Nothing in this crate is fatal to the host page. Errors are produced so
//! callers can log them, then degrade to a state that still lets the user
//! reach the content manually (see [`SubmenuOutcome`]).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for headernav operations
#[derive(Error, Debug)]
pub enum NavError {
    // ===================
    // Fetch Errors
    // ===================
    #[error("Cannot resolve submenu source '{source_url}' against {base}")]
    InvalidSourceUrl {
        source_url: String,
        base: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Refusing cross-origin submenu source {url} (page origin {origin})")]
    CrossOrigin { url: String, origin: String },

    // ===================
    // Extraction Errors
    // ===================
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("No candidates for '{selector}' in {url}")]
    NoCandidates { url: String, selector: String },

    // ===================
    // Cache Errors
    // ===================
    #[error("Malformed cache entry {key}")]
    CacheDecode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode cache entry {key}")]
    CacheEncode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache store rejected {key}: {message}")]
    CacheStore { key: String, message: String },

    // ===================
    // Config Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to parse TOML config: {message}")]
    ConfigToml {
        message: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config")]
    ConfigJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NavError {
    /// True for failures that resolve to the "view all" fallback link
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            NavError::InvalidSourceUrl { .. }
                | NavError::Network { .. }
                | NavError::HttpStatus { .. }
                | NavError::CrossOrigin { .. }
                | NavError::InvalidSelector { .. }
                | NavError::NoCandidates { .. }
        )
    }
}

/// How a dynamic submenu ended up being rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmenuOutcome {
    /// Fresh fetch, `count` items rendered
    Fetched { count: usize },
    /// Served from the versioned cache, network skipped
    Cached { count: usize },
    /// Single "view all" link rendered instead
    Fallback { reason: String },
}

impl SubmenuOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SubmenuOutcome::Fallback { .. })
    }

    /// Number of item links rendered (fallback renders one link but zero items)
    pub fn item_count(&self) -> usize {
        match self {
            SubmenuOutcome::Fetched { count } | SubmenuOutcome::Cached { count } => *count,
            SubmenuOutcome::Fallback { .. } => 0,
        }
    }
}
