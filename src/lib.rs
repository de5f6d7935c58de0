//! favi - Favicon resolver
//!
//! Turns page URLs into favicon data URIs. Icons come from an in-process
//! map, a persistent store with a TTL, or a race between the site itself
//! and third-party favicon services. When everything fails a coloured
//! letter tile is generated, so resolution never errors.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod providers;
pub mod resolver;
pub mod ui;

pub use error::{FaviError, FaviResult};
pub use resolver::{FallbackReason, FaviconResolver, IconSource, Resolution, ResolverSettings};
