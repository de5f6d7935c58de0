//! In-memory icon store

use super::{IconCacheEntry, IconStore};
use crate::error::{FaviError, FaviResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Icon store that lives only as long as the process
///
/// Backs `--no-persist` runs and resolver tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, IconCacheEntry>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> FaviResult<std::sync::MutexGuard<'_, HashMap<String, IconCacheEntry>>> {
        self.entries
            .lock()
            .map_err(|_| FaviError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl IconStore for MemoryStore {
    async fn get(&self, key: &str) -> FaviResult<Option<IconCacheEntry>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, entry: &IconCacheEntry) -> FaviResult<()> {
        self.lock()?.insert(key.to_string(), entry.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> FaviResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn entries(&self) -> FaviResult<Vec<IconCacheEntry>> {
        let mut entries: Vec<IconCacheEntry> = self.lock()?.values().cloned().collect();
        entries.sort_by(|a, b| a.domain.cmp(&b.domain));
        Ok(entries)
    }

    async fn clear(&self) -> FaviResult<usize> {
        let mut entries = self.lock()?;
        let count = entries.len();
        entries.clear();
        Ok(count)
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
