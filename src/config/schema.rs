//! Configuration schema for favi
//!
//! Configuration is stored at `~/.config/favi/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Network race settings
    pub resolver: ResolverConfig,

    /// Persistent icon cache settings
    pub cache: CacheConfig,

    /// Candidate icon sources
    pub providers: ProvidersConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Settings for the concurrent provider race
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Per-candidate timeout in milliseconds
    pub timeout_ms: u64,

    /// Largest icon payload accepted, in bytes
    pub max_icon_bytes: usize,

    /// User-Agent sent with every icon request
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_icon_bytes: 500 * 1024,
            user_agent: format!("favi/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Persistent cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Days before a persisted icon is fetched again
    pub ttl_days: u32,

    /// Write fetched icons to disk
    pub persist: bool,

    /// Override for the icon cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_days: 7,
            persist: true,
            dir: None,
        }
    }
}

/// Candidate source configuration
///
/// Service templates accept `{domain}`, `{bare_domain}`, `{origin}` and
/// `{origin_encoded}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Paths tried at the site's own origin, in order
    pub site_paths: Vec<String>,

    /// Also try `/favicon.ico` on the origin without a leading `www.`
    pub strip_www: bool,

    /// Third-party favicon services
    pub services: Vec<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            site_paths: vec!["/favicon.ico".to_string(), "/favicon.png".to_string()],
            strip_www: true,
            services: default_services(),
        }
    }
}

/// Third-party services, most reliable first
pub fn default_services() -> Vec<String> {
    [
        "https://www.google.com/s2/favicons?domain={domain}&sz=64",
        "https://icon.horse/icon/{domain}",
        "https://favicon.yandex.net/favicon/{domain}",
        "https://api.faviconkit.com/{domain}/64",
        "https://icons.duckduckgo.com/ip3/{domain}.ico",
        "https://www.google.com/s2/favicons?domain={bare_domain}&sz=64",
        "https://favicons.githubusercontent.com/{domain}",
        "https://t0.gstatic.com/faviconV2?client=SOCIAL&type=FAVICON&fallback_opts=TYPE,SIZE,URL&url={origin_encoded}&size=64",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
