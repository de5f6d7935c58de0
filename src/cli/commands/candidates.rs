//! Candidates command - show where a resolve would look

use crate::cli::args::CandidatesArgs;
use crate::config::Config;
use crate::error::{FaviError, FaviResult};
use crate::providers::{self, Target};
use crate::ui::{self, UiContext};

/// Execute the candidates command
pub async fn execute(args: CandidatesArgs, config: &Config) -> FaviResult<()> {
    let target = Target::parse(&args.url)
        .ok_or_else(|| FaviError::User(format!("Not an absolute URL with a host: {}", args.url)))?;

    let candidates = providers::candidates(&target, &config.providers);
    if candidates.is_empty() {
        let ctx = UiContext::detect();
        ui::step_warn_hint(
            &ctx,
            "No candidate sources configured",
            "Set providers.site_paths or providers.services",
        );
        return Ok(());
    }

    for url in candidates {
        println!("{}", url);
    }

    Ok(())
}
