//! Persistent icon cache
//!
//! Fetched icons are kept in two tiers: the resolver's in-process map and an
//! [`IconStore`] that survives restarts. Store entries carry the time they
//! were fetched and stop being served once older than the configured TTL.
//!
//! # Entry States
//!
//! | State | Served | Description |
//! |-------|--------|-------------|
//! | Missing | no | Never fetched, or removed |
//! | Fresh | yes | Younger than the TTL |
//! | Stale | no | Older than the TTL, overwritten on the next fetch |
//!
//! Generated fallback icons never reach the store.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{Config, ConfigManager};
use crate::error::FaviResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Prefix shared by every persisted icon key
pub const KEY_PREFIX: &str = "favicon_";

/// Build the store key for a domain
pub fn cache_key(domain: &str) -> String {
    format!("{}{}", KEY_PREFIX, domain)
}

/// A fetched icon as persisted in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconCacheEntry {
    /// Hostname the icon belongs to
    pub domain: String,

    /// The icon as a `data:` URI
    pub icon: String,

    /// When the icon was fetched (milliseconds since epoch on disk)
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub fetched_at: DateTime<Utc>,
}

impl IconCacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(domain: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            icon: icon.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Age of the entry relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// Check if the entry may still be served
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) < ttl
    }
}

/// Key-value storage for fetched icons
#[async_trait]
pub trait IconStore: Send + Sync {
    /// Look up an entry, `None` if absent
    async fn get(&self, key: &str) -> FaviResult<Option<IconCacheEntry>>;

    /// Insert or replace an entry
    async fn set(&self, key: &str, entry: &IconCacheEntry) -> FaviResult<()>;

    /// Remove an entry if present
    async fn remove(&self, key: &str) -> FaviResult<()>;

    /// All readable entries
    async fn entries(&self) -> FaviResult<Vec<IconCacheEntry>>;

    /// Remove every entry, returning how many were removed
    async fn clear(&self) -> FaviResult<usize>;

    /// Remove entries older than `ttl`, returning how many were removed
    async fn prune(&self, ttl: Duration, now: DateTime<Utc>) -> FaviResult<usize> {
        let mut removed = 0;
        for entry in self.entries().await? {
            if !entry.is_fresh(ttl, now) {
                self.remove(&cache_key(&entry.domain)).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Human-readable location of the store
    fn location(&self) -> String;
}

/// Open the store a configuration asks for
///
/// Persistence can be switched off by `cache.persist = false` or by
/// `no_persist`; either way an empty [`MemoryStore`] is returned.
pub async fn open_store(
    config: &Config,
    cache_dir: Option<&Path>,
    no_persist: bool,
) -> FaviResult<Arc<dyn IconStore>> {
    if no_persist || !config.cache.persist {
        debug!("Persistence disabled, using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let dir = ConfigManager::cache_dir_for(config, cache_dir);
    Ok(Arc::new(FileStore::new(dir).await?))
}
