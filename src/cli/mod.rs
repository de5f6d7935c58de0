//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use std::path::PathBuf;

/// Global flags that shape how the cache is opened
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Explicit cache directory
    pub cache_dir: Option<PathBuf>,
    /// Use an in-memory store
    pub no_persist: bool,
}

impl From<&Cli> for CacheOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            cache_dir: cli.cache_dir.clone(),
            no_persist: cli.no_persist,
        }
    }
}
