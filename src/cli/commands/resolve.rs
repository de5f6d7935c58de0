//! Resolve command - turn page URLs into favicon data URIs

use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::cli::commands::cache::size_label;
use crate::cli::CacheOptions;
use crate::config::Config;
use crate::error::{FaviError, FaviResult};
use crate::providers::Target;
use crate::resolver::{FaviconResolver, IconSource, Resolution};
use crate::ui::{self, ResolveProgress, UiContext};
use console::style;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config, opts: &CacheOptions) -> FaviResult<()> {
    let urls = if args.urls.is_empty() {
        read_stdin_urls().await?
    } else {
        args.urls
    };

    if urls.is_empty() {
        return Err(FaviError::User(
            "No URLs given. Pass them as arguments or one per line on stdin".to_string(),
        ));
    }

    let resolver =
        FaviconResolver::from_config(config, opts.cache_dir.as_deref(), opts.no_persist).await?;

    if args.refresh {
        for target in urls.iter().filter_map(|u| Target::parse(u)) {
            debug!("Forgetting cached icon for {}", target.domain);
            resolver.forget(&target.domain).await?;
        }
    }

    let results = resolve_with_progress(&resolver, &urls).await;

    match args.format {
        OutputFormat::Plain => print_plain(&results),
        OutputFormat::Table => print_table(&urls, &results),
        OutputFormat::Json => print_json(&urls, &results)?,
    }

    Ok(())
}

async fn read_stdin_urls() -> FaviResult<Vec<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut urls = Vec::new();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| FaviError::io("reading URLs from stdin", e))?
    {
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            urls.push(line.to_string());
        }
    }

    Ok(urls)
}

/// Resolve all URLs concurrently, keeping input order
async fn resolve_with_progress(resolver: &FaviconResolver, urls: &[String]) -> Vec<Resolution> {
    let ctx = UiContext::detect();
    let progress = ResolveProgress::new(&ctx, urls.len() as u64);

    let mut pending: FuturesUnordered<_> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| async move { (i, resolver.resolve_detailed(url).await) })
        .collect();

    let mut slots: Vec<Option<Resolution>> = vec![None; urls.len()];
    while let Some((i, resolution)) = pending.next().await {
        progress.advance(&urls[i]);
        slots[i] = Some(resolution);
    }
    progress.finish();

    slots.into_iter().flatten().collect()
}

fn print_plain(results: &[Resolution]) {
    for resolution in results {
        println!("{}", resolution.icon);
    }
}

fn print_table(urls: &[String], results: &[Resolution]) {
    println!(
        "{:<40} {:<28} {:<32} {:>8}",
        style("URL").bold(),
        style("DOMAIN").bold(),
        style("SOURCE").bold(),
        style("BYTES").bold()
    );
    println!("{}", "-".repeat(111));

    for (url, resolution) in urls.iter().zip(results) {
        let source = match &resolution.source {
            IconSource::Memory | IconSource::Persistent => {
                style(resolution.source.to_string()).cyan()
            }
            IconSource::Provider { .. } => style(resolution.source.to_string()).green(),
            IconSource::Fallback(_) => style(resolution.source.to_string()).yellow(),
        };

        println!(
            "{:<40} {:<28} {:<32} {:>8}",
            clip(url, 40),
            resolution.domain.as_deref().unwrap_or("-"),
            source,
            size_label(&resolution.icon)
        );
    }

    println!();
    println!("Total: {} icon(s)", results.len());

    let generated = results
        .iter()
        .filter(|r| matches!(r.source, IconSource::Fallback(_)))
        .count();
    if generated > 0 {
        let ctx = UiContext::detect();
        ui::step_warn(
            &ctx,
            &format!("{} URL(s) fell back to a generated icon", generated),
        );
    }
}

fn print_json(urls: &[String], results: &[Resolution]) -> FaviResult<()> {
    #[derive(serde::Serialize)]
    struct ResolutionJson<'a> {
        url: &'a str,
        domain: Option<&'a str>,
        source: String,
        provider_url: Option<&'a str>,
        icon: &'a str,
    }

    let rows: Vec<ResolutionJson<'_>> = urls
        .iter()
        .zip(results)
        .map(|(url, r)| ResolutionJson {
            url,
            domain: r.domain.as_deref(),
            source: r.source.to_string(),
            provider_url: match &r.source {
                IconSource::Provider { url } => Some(url.as_str()),
                _ => None,
            },
            icon: &r.icon,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 1).collect();
        format!("{}…", head)
    } else {
        s.to_string()
    }
}
