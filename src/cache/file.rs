//! File-backed icon store, one JSON document per key

use super::{IconCacheEntry, IconStore};
use crate::error::{FaviError, FaviResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Icon store keeping each entry in `<dir>/<key>.json`
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `cache_dir`, creating the directory if needed
    pub async fn new(cache_dir: impl Into<PathBuf>) -> FaviResult<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).await.map_err(|e| {
            FaviError::io(format!("creating icon cache dir {}", cache_dir.display()), e)
        })?;

        Ok(Self { cache_dir })
    }

    /// Directory holding the entries
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Map a key onto a safe file stem. Hostnames pass through unchanged; IPv6
/// brackets and port colons do not.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl IconStore for FileStore {
    async fn get(&self, key: &str) -> FaviResult<Option<IconCacheEntry>> {
        let path = self.cache_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&path)
                .await
                .map_err(|e| FaviError::CacheEntryRead {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;

        match serde_json::from_str::<IconCacheEntry>(&content) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!("Discarding corrupt cache entry {}: {}", key, e);
                self.remove(key).await?;
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, entry: &IconCacheEntry) -> FaviResult<()> {
        let path = self.cache_path(key);
        let content = serde_json::to_string(entry)?;

        fs::write(&path, content)
            .await
            .map_err(|e| FaviError::cache_write(key, e))?;

        debug!("Cached icon {} at {}", key, entry.fetched_at);
        Ok(())
    }

    async fn remove(&self, key: &str) -> FaviResult<()> {
        let path = self.cache_path(key);
        if path.exists() {
            fs::remove_file(&path).await.map_err(|e| {
                FaviError::io(format!("removing cache file {}", path.display()), e)
            })?;
        }
        Ok(())
    }

    async fn entries(&self) -> FaviResult<Vec<IconCacheEntry>> {
        if !self.cache_dir.exists() {
            return Err(FaviError::CacheDirNotFound(self.cache_dir.clone()));
        }

        let mut dir = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| FaviError::io("reading cache directory", e))?;

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| FaviError::io("reading cache entry", e))?
        {
            let path = item.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            let content = match fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable cache file {}: {}", path.display(), e);
                    continue;
                }
            };

            match serde_json::from_str::<IconCacheEntry>(&content) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping corrupt cache file {}: {}", path.display(), e),
            }
        }

        entries.sort_by(|a, b| a.domain.cmp(&b.domain));
        Ok(entries)
    }

    async fn clear(&self) -> FaviResult<usize> {
        let mut dir = fs::read_dir(&self.cache_dir)
            .await
            .map_err(|e| FaviError::io("reading cache directory", e))?;

        let mut removed = 0;
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| FaviError::io("reading cache entry", e))?
        {
            if item.path().extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(item.path())
                    .await
                    .map_err(|e| FaviError::io("removing cache file", e))?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn location(&self) -> String {
        self.cache_dir.display().to_string()
    }
}
