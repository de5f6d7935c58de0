//! Error types for favi
//!
//! All fallible modules use `FaviResult<T>` as their return type. The
//! resolver itself never surfaces these to callers; they show up in the
//! config, cache and CLI layers.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for favi operations
pub type FaviResult<T> = Result<T, FaviError>;

/// All errors that can occur in favi
#[derive(Error, Debug)]
pub enum FaviError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Cache errors
    #[error("Failed to read cache entry {key}: {reason}")]
    CacheEntryRead { key: String, reason: String },

    #[error("Failed to write cache entry {key}: {reason}")]
    CacheEntryWrite { key: String, reason: String },

    #[error("Cache directory not found: {0}")]
    CacheDirNotFound(PathBuf),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl FaviError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a cache write error
    pub fn cache_write(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::CacheEntryWrite {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigInvalid { .. } => Some("Run: favi config init --force"),
            Self::CacheEntryRead { .. } | Self::CacheEntryWrite { .. } => {
                Some("Run: favi cache clear --yes")
            }
            Self::CacheDirNotFound(_) => Some("Check --cache-dir or FAVI_CACHE_DIR"),
            _ => None,
        }
    }
}
