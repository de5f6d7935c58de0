//! Favicon resolution
//!
//! [`FaviconResolver::resolve`] turns a page URL into an image source that
//! can be used directly, and never fails. Per domain it walks:
//!
//! | Step | Source | I/O |
//! |------|--------|-----|
//! | 1 | in-process map | none |
//! | 2 | in-flight resolution for the same domain | none |
//! | 3 | persistent store, if younger than the TTL | store read |
//! | 4-5 | concurrent race over all candidate URLs | network |
//! | 6 | generated tile | none |
//!
//! Fetched icons are written to both tiers. Generated tiles are kept in the
//! in-process map only, so they are retried after a restart.
//!
//! # Concurrency
//!
//! The in-process map and the pending table share one mutex that is never
//! held across an await. A pending resolution is a [`Shared`] future, so every
//! caller for a domain awaits the same race and sees the same icon. The map
//! is updated before the pending entry is removed; a caller that misses the
//! map under the lock will always find the pending entry instead.

use crate::cache::{self, cache_key, IconCacheEntry, IconStore};
use crate::config::schema::ProvidersConfig;
use crate::config::Config;
use crate::error::FaviResult;
use crate::fallback;
use crate::fetch::{self, HttpFetcher, IconFetcher, ProviderFailure};
use crate::providers::{self, Target};
use chrono::Utc;
use futures_util::future::{join_all, BoxFuture, FutureExt, Shared};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a resolved icon came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// In-process map
    Memory,
    /// Persistent store
    Persistent,
    /// Won the provider race
    Provider { url: String },
    /// Generated tile
    Fallback(FallbackReason),
}

impl fmt::Display for IconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Persistent => write!(f, "persistent"),
            Self::Provider { .. } => write!(f, "provider"),
            Self::Fallback(reason) => write!(f, "fallback ({})", reason),
        }
    }
}

/// Why a generated tile was returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Input was not an absolute URL with a host
    InvalidUrl,
    /// Candidate generation produced nothing to try
    NoCandidates,
    /// Every candidate failed or timed out
    AllProvidersFailed,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::InvalidUrl => "invalid url",
            Self::NoCandidates => "no candidates",
            Self::AllProvidersFailed => "all providers failed",
        };
        write!(f, "{}", reason)
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Image source, always a `data:` URI
    pub icon: String,
    /// Domain the icon is cached under, `None` for invalid input
    pub domain: Option<String>,
    /// Where the icon came from
    pub source: IconSource,
}

impl Resolution {
    fn fallback(domain: Option<String>, icon: String, reason: FallbackReason) -> Self {
        Self {
            icon,
            domain,
            source: IconSource::Fallback(reason),
        }
    }
}

/// Tunables for a resolver
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Per-candidate timeout
    pub timeout: Duration,
    /// Largest accepted icon payload in bytes
    pub max_icon_bytes: usize,
    /// Age after which a persisted icon is fetched again
    pub cache_ttl: chrono::Duration,
    /// Candidate sources
    pub providers: ProvidersConfig,
}

impl ResolverSettings {
    /// Settings from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_millis(config.resolver.timeout_ms),
            max_icon_bytes: config.resolver.max_icon_bytes,
            cache_ttl: chrono::Duration::days(i64::from(config.cache.ttl_days)),
            providers: config.providers.clone(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

type PendingResolution = Shared<BoxFuture<'static, Resolution>>;

#[derive(Default)]
struct State {
    /// domain -> icon
    icons: HashMap<String, String>,
    /// domain -> in-flight resolution
    pending: HashMap<String, PendingResolution>,
}

struct Inner {
    settings: ResolverSettings,
    store: Arc<dyn IconStore>,
    fetcher: Arc<dyn IconFetcher>,
    state: Mutex<State>,
}

/// Resolves page URLs to favicons with layered caching
///
/// Cloning is cheap and clones share caches.
#[derive(Clone)]
pub struct FaviconResolver {
    inner: Arc<Inner>,
}

impl FaviconResolver {
    /// Create a resolver over the given store and transport
    pub fn new(
        settings: ResolverSettings,
        store: Arc<dyn IconStore>,
        fetcher: Arc<dyn IconFetcher>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                store,
                fetcher,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Build the resolver described by a configuration
    ///
    /// Uses a [`FileStore`](crate::cache::FileStore) unless persistence is disabled by the config or
    /// by `no_persist`, and an [`HttpFetcher`] for the network.
    pub async fn from_config(
        config: &Config,
        cache_dir: Option<&Path>,
        no_persist: bool,
    ) -> FaviResult<Self> {
        let settings = ResolverSettings::from_config(config);
        let store = cache::open_store(config, cache_dir, no_persist).await?;
        let fetcher: Arc<dyn IconFetcher> = Arc::new(HttpFetcher::new(
            settings.timeout,
            settings.max_icon_bytes,
            &config.resolver.user_agent,
        ));

        Ok(Self::new(settings, store, fetcher))
    }

    /// Resolve a URL to an image source
    pub async fn resolve(&self, url: &str) -> String {
        self.resolve_detailed(url).await.icon
    }

    /// Resolve a URL and report where the icon came from
    pub async fn resolve_detailed(&self, url: &str) -> Resolution {
        let Some(target) = Target::parse(url) else {
            debug!("Invalid URL {:?}, generating fallback", url);
            return Resolution::fallback(
                None,
                fallback::for_raw_input(url),
                FallbackReason::InvalidUrl,
            );
        };

        let pending = {
            let mut state = self.inner.lock_state();

            if let Some(icon) = state.icons.get(&target.domain) {
                debug!("Memory hit for {}", target.domain);
                return Resolution {
                    icon: icon.clone(),
                    domain: Some(target.domain),
                    source: IconSource::Memory,
                };
            }

            match state.pending.get(&target.domain) {
                Some(pending) => {
                    debug!("Joining in-flight resolution for {}", target.domain);
                    pending.clone()
                }
                None => {
                    let domain = target.domain.clone();
                    let pending = Inner::resolve_uncached(Arc::clone(&self.inner), target)
                        .boxed()
                        .shared();
                    state.pending.insert(domain, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Resolve several URLs concurrently, results in input order
    pub async fn resolve_all<S: AsRef<str>>(&self, urls: &[S]) -> Vec<Resolution> {
        join_all(urls.iter().map(|url| self.resolve_detailed(url.as_ref()))).await
    }

    /// Icon currently held in the in-process map for a domain
    pub fn cached(&self, domain: &str) -> Option<String> {
        self.inner.lock_state().icons.get(domain).cloned()
    }

    /// Drop a domain from both tiers so the next resolve starts over
    pub async fn forget(&self, domain: &str) -> FaviResult<()> {
        self.inner.lock_state().icons.remove(domain);
        self.inner.store.remove(&cache_key(domain)).await
    }

    /// Candidate URLs that a race for `url` would try
    pub fn candidates(&self, url: &str) -> Option<Vec<String>> {
        Target::parse(url).map(|t| providers::candidates(&t, &self.inner.settings.providers))
    }

    /// The persistent store behind this resolver
    pub fn store(&self) -> &Arc<dyn IconStore> {
        &self.inner.store
    }

    /// Settings in effect
    pub fn settings(&self) -> &ResolverSettings {
        &self.inner.settings
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        // State is plain maps; a panic elsewhere cannot leave them half-written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn resolve_uncached(inner: Arc<Inner>, target: Target) -> Resolution {
        let resolution = inner.resolve_domain(&target).await;

        let mut state = inner.lock_state();
        state
            .icons
            .insert(target.domain.clone(), resolution.icon.clone());
        state.pending.remove(&target.domain);

        resolution
    }

    async fn resolve_domain(&self, target: &Target) -> Resolution {
        let domain = target.domain.clone();
        let key = cache_key(&domain);

        match self.store.get(&key).await {
            Ok(Some(entry)) if entry.is_fresh(self.settings.cache_ttl, Utc::now()) => {
                debug!("Persistent hit for {}", domain);
                return Resolution {
                    icon: entry.icon,
                    domain: Some(domain),
                    source: IconSource::Persistent,
                };
            }
            Ok(Some(_)) => debug!("Persisted icon for {} expired", domain),
            Ok(None) => debug!("No persisted icon for {}", domain),
            Err(e) => debug!("Persistent lookup for {} failed: {}", domain, e),
        }

        let candidates = providers::candidates(target, &self.settings.providers);
        if candidates.is_empty() {
            return Resolution::fallback(
                Some(domain.clone()),
                fallback::for_domain(&domain),
                FallbackReason::NoCandidates,
            );
        }

        match self.race(candidates).await {
            Some((url, icon)) => {
                info!("Resolved icon for {} from {}", domain, url);
                let entry = IconCacheEntry::new(domain.clone(), icon.clone());
                if let Err(e) = self.store.set(&key, &entry).await {
                    warn!("Could not persist icon for {}: {}", domain, e);
                }
                Resolution {
                    icon,
                    domain: Some(domain),
                    source: IconSource::Provider { url },
                }
            }
            None => {
                debug!("All providers failed for {}, generating fallback", domain);
                Resolution::fallback(
                    Some(domain.clone()),
                    fallback::for_domain(&domain),
                    FallbackReason::AllProvidersFailed,
                )
            }
        }
    }

    /// First candidate to produce a valid icon, as `(url, data uri)`
    async fn race(&self, candidates: Vec<String>) -> Option<(String, String)> {
        let timeout = self.settings.timeout;
        let max_bytes = self.settings.max_icon_bytes;

        let mut attempts: FuturesUnordered<_> = candidates
            .into_iter()
            .map(|url| {
                let fetcher = Arc::clone(&self.fetcher);
                async move {
                    let outcome = match tokio::time::timeout(timeout, fetcher.fetch(&url)).await {
                        Ok(Ok(response)) => fetch::validate(response, max_bytes),
                        Ok(Err(e)) => Err(e),
                        Err(_) => Err(ProviderFailure::Timeout(timeout)),
                    };
                    (url, outcome)
                }
            })
            .collect();

        while let Some((url, outcome)) = attempts.next().await {
            match outcome {
                Ok(payload) => return Some((url, payload.to_data_uri())),
                Err(e) => debug!("Candidate {} rejected: {}", url, e),
            }
        }

        None
    }
}
