//! Cache command - manage the persistent icon cache

use crate::cache::{self, IconCacheEntry, IconStore};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::cli::CacheOptions;
use crate::config::{Config, ConfigManager};
use crate::error::FaviResult;
use crate::fetch::data_uri_payload_len;
use crate::ui::{self, UiContext};
use chrono::{Duration, Utc};
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config, opts: &CacheOptions) -> FaviResult<()> {
    if let CacheAction::Path = args.action {
        println!(
            "{}",
            ConfigManager::cache_dir_for(config, opts.cache_dir.as_deref()).display()
        );
        return Ok(());
    }

    let store = cache::open_store(config, opts.cache_dir.as_deref(), opts.no_persist).await?;

    match args.action {
        CacheAction::List { format } => list_icons(&*store, config, format).await,
        CacheAction::Prune { days, dry_run } => prune_icons(&*store, config, days, dry_run).await,
        CacheAction::Clear { yes } => {
            let ctx = UiContext::detect().with_auto_yes(yes);
            clear_icons(&*store, &ctx).await
        }
        CacheAction::Path => Ok(()),
    }
}

/// List cached icons
async fn list_icons(store: &dyn IconStore, config: &Config, format: OutputFormat) -> FaviResult<()> {
    let entries = store.entries().await?;

    if entries.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, &format!("No cached icons in {}", store.location()));
            }
        }
        return Ok(());
    }

    let ttl = Duration::days(i64::from(config.cache.ttl_days));
    match format {
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            ui::section(&ctx, "Icon cache");
            ui::key_value(&ctx, "Location", &store.location());
            ui::key_value(&ctx, "TTL", &format!("{} days", config.cache.ttl_days));
            println!();
            print_table(&entries, ttl);
        }
        OutputFormat::Json => print_json(&entries, ttl)?,
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.domain);
            }
        }
    }

    Ok(())
}

fn print_table(entries: &[IconCacheEntry], ttl: Duration) {
    let now = Utc::now();

    println!(
        "{:<40} {:<16} {:<8} {:>8}",
        style("DOMAIN").bold(),
        style("FETCHED").bold(),
        style("STATE").bold(),
        style("BYTES").bold()
    );
    println!("{}", "-".repeat(75));

    for entry in entries {
        let state = if entry.is_fresh(ttl, now) {
            style("fresh").green()
        } else {
            style("stale").yellow()
        };

        println!(
            "{:<40} {:<16} {:<8} {:>8}",
            entry.domain,
            entry.fetched_at.format("%Y-%m-%d %H:%M").to_string(),
            state,
            size_label(&entry.icon)
        );
    }

    println!();
    println!("Total: {} icon(s)", entries.len());
}

/// Decoded image size, or `-` when the icon is not a base64 data URI
pub(crate) fn size_label(icon: &str) -> String {
    data_uri_payload_len(icon).map_or_else(|| "-".to_string(), |n| n.to_string())
}

fn print_json(entries: &[IconCacheEntry], ttl: Duration) -> FaviResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson<'a> {
        domain: &'a str,
        fetched_at: String,
        fresh: bool,
        bytes: Option<usize>,
    }

    let now = Utc::now();
    let rows: Vec<EntryJson<'_>> = entries
        .iter()
        .map(|e| EntryJson {
            domain: &e.domain,
            fetched_at: e.fetched_at.to_rfc3339(),
            fresh: e.is_fresh(ttl, now),
            bytes: data_uri_payload_len(&e.icon),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

/// Remove icons older than the TTL
async fn prune_icons(
    store: &dyn IconStore,
    config: &Config,
    days_override: Option<u32>,
    dry_run: bool,
) -> FaviResult<()> {
    let days = days_override.unwrap_or(config.cache.ttl_days);
    let ttl = Duration::days(i64::from(days));
    let now = Utc::now();

    let stale: Vec<IconCacheEntry> = store
        .entries()
        .await?
        .into_iter()
        .filter(|e| !e.is_fresh(ttl, now))
        .collect();

    if stale.is_empty() {
        println!("No icons older than {} days.", days);
        return Ok(());
    }

    println!("Found {} icon(s) older than {} days:", stale.len(), days);
    for entry in &stale {
        println!(
            "  {} {} ({} days old)",
            style("•").red(),
            entry.domain,
            entry.age(now).num_days()
        );
    }

    if dry_run {
        println!();
        println!("Dry run - no icons removed.");
        return Ok(());
    }

    let removed = store.prune(ttl, now).await?;
    println!();
    println!("{} removed {} icon(s)", style("✓").green(), removed);

    Ok(())
}

/// Remove every cached icon
async fn clear_icons(store: &dyn IconStore, ctx: &UiContext) -> FaviResult<()> {
    let entries = store.entries().await?;

    if entries.is_empty() {
        ui::step_info(ctx, "No cached icons to clear.");
        return Ok(());
    }

    println!(
        "This will remove {} cached icon(s) from {}",
        entries.len(),
        store.location()
    );

    if !ui::confirm(ctx, "Are you sure?", false).await? {
        ui::step_warn_hint(ctx, "Aborted", "Pass --yes to clear without a prompt");
        return Ok(());
    }

    let removed = store.clear().await?;
    ui::step_ok(ctx, &format!("Cleared {} icon(s)", removed));

    Ok(())
}
