//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// favi - favicon resolver
///
/// Resolves page URLs to favicons as data URIs, using a local cache,
/// concurrent third-party providers and a generated fallback tile.
#[derive(Parser, Debug)]
#[command(name = "favi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FAVI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Icon cache directory
    #[arg(long, global = true, env = "FAVI_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep fetched icons in memory only
    #[arg(long, global = true)]
    pub no_persist: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve URLs to favicon data URIs
    Resolve(ResolveArgs),

    /// Show the candidate icon URLs for a page
    Candidates(CandidatesArgs),

    /// Manage the persistent icon cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Page URLs (read from stdin, one per line, when omitted)
    pub urls: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: OutputFormat,

    /// Forget cached icons for these domains before resolving
    #[arg(long)]
    pub refresh: bool,
}

/// Arguments for the candidates command
#[derive(Parser, Debug)]
pub struct CandidatesArgs {
    /// Page URL
    pub url: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.ttl_days)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached icons
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove icons older than the TTL
    Prune {
        /// Remove icons older than N days (default: from config)
        #[arg(long)]
        days: Option<u32>,

        /// Dry run - show what would be removed
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove every cached icon
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the cache directory
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_resolve() {
        let cli = Cli::parse_from(["favi", "resolve", "https://a.test", "https://b.test"]);
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.urls, vec!["https://a.test", "https://b.test"]);
                assert_eq!(args.format, OutputFormat::Plain);
                assert!(!args.refresh);
            }
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn cli_parses_resolve_flags() {
        let cli = Cli::parse_from(["favi", "resolve", "--refresh", "-f", "json"]);
        match cli.command {
            Commands::Resolve(args) => {
                assert!(args.urls.is_empty());
                assert!(args.refresh);
                assert_eq!(args.format, OutputFormat::Json);
            }
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn cli_parses_global_cache_flags() {
        let cli = Cli::parse_from([
            "favi",
            "cache",
            "list",
            "--cache-dir",
            "/tmp/icons",
            "--no-persist",
        ]);
        assert_eq!(cli.cache_dir, Some(PathBuf::from("/tmp/icons")));
        assert!(cli.no_persist);
        assert!(matches!(
            cli.command,
            Commands::Cache(CacheArgs {
                action: CacheAction::List {
                    format: OutputFormat::Table
                }
            })
        ));
    }

    #[test]
    fn cli_parses_prune() {
        let cli = Cli::parse_from(["favi", "cache", "prune", "--days", "3", "--dry-run"]);
        match cli.command {
            Commands::Cache(CacheArgs {
                action: CacheAction::Prune { days, dry_run },
            }) => {
                assert_eq!(days, Some(3));
                assert!(dry_run);
            }
            _ => panic!("expected Cache Prune command"),
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["favi", "config", "set", "cache.ttl_days", "3"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Set { key, value }),
            }) => {
                assert_eq!(key, "cache.ttl_days");
                assert_eq!(value, "3");
            }
            _ => panic!("expected Config Set command"),
        }
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["favi", "candidates", "https://a.test"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["favi", "-v", "candidates", "https://a.test"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["favi", "-vv", "candidates", "https://a.test"]);
        assert_eq!(cli.verbose, 2);
    }
}
