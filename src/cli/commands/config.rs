//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{FaviError, FaviResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> FaviResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut updated = config.clone();
            apply_value(&mut updated, &key, &value)?;
            manager.save(&updated).await?;

            let ctx = UiContext::detect();
            ui::step_ok(&ctx, &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> FaviResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> FaviResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok(
        &ctx,
        &format!("Configuration initialized at {}", path.display()),
    );

    Ok(())
}

/// Apply a dot-separated key to a config. List values are whitespace-separated.
fn apply_value(config: &mut Config, key: &str, value: &str) -> FaviResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = parse_log_format(value)?,

        ["resolver", "timeout_ms"] => config.resolver.timeout_ms = parse_num(key, value)?,
        ["resolver", "max_icon_bytes"] => config.resolver.max_icon_bytes = parse_num(key, value)?,
        ["resolver", "user_agent"] => config.resolver.user_agent = value.to_string(),

        ["cache", "ttl_days"] => config.cache.ttl_days = parse_num(key, value)?,
        ["cache", "persist"] => config.cache.persist = parse_bool(value)?,
        ["cache", "dir"] => {
            config.cache.dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        }

        ["providers", "strip_www"] => config.providers.strip_www = parse_bool(value)?,
        ["providers", "site_paths"] => config.providers.site_paths = parse_list(value),
        ["providers", "services"] => config.providers.services = parse_list(value),

        _ => {
            return Err(FaviError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "resolver.timeout_ms",
    "resolver.max_icon_bytes",
    "resolver.user_agent",
    "cache.ttl_days",
    "cache.persist",
    "cache.dir",
    "providers.strip_www",
    "providers.site_paths",
    "providers.services",
];

fn parse_bool(value: &str) -> FaviResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(FaviError::User(format!("Invalid boolean value: {}", value))),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> FaviResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| FaviError::User(format!("Invalid number for {}: {}", key, value)))
}

fn parse_log_format(value: &str) -> FaviResult<String> {
    match value {
        "text" | "json" => Ok(value.to_string()),
        _ => Err(FaviError::User(format!(
            "Invalid log format: {} (expected text or json)",
            value
        ))),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
