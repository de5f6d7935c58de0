//! favi - Favicon resolver
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use favi::cli::{CacheOptions, Cli, Commands};
use favi::config::{Config, ConfigManager};
use favi::error::FaviResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> FaviResult<()> {
    let cli = Cli::parse();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    // Logging needs the configured format, so load before the subscriber exists
    let config = config_manager.load().await?;
    init_logging(cli.verbose, &config);
    debug!("Using config at {}", config_manager.path().display());

    let opts = CacheOptions::from(&cli);

    match cli.command {
        Commands::Resolve(args) => favi::cli::commands::resolve(args, &config, &opts).await,
        Commands::Candidates(args) => favi::cli::commands::candidates(args, &config).await,
        Commands::Cache(args) => favi::cli::commands::cache(args, &config, &opts).await,
        Commands::Config(args) => {
            favi::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug. Logs go to stderr so stdout stays pipeable.
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("favi=warn"),
        1 => EnvFilter::new("favi=info"),
        _ => EnvFilter::new("favi=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
