//! Progress indicator for batch resolves

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over a batch of URLs
///
/// Draws an indicatif bar on stderr in interactive mode and stays silent
/// otherwise, so stdout carries only results.
pub struct ResolveProgress {
    bar: Option<ProgressBar>,
}

impl ResolveProgress {
    /// Create a bar for `total` URLs
    pub fn new(ctx: &UiContext, total: u64) -> Self {
        // A single URL resolves too quickly for a bar to be useful
        let bar = if ctx.use_fancy_output() && total > 1 {
            let bar = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} Resolving  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}")
                .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ").progress_chars("━╸─"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Record one finished URL
    pub fn advance(&self, label: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(truncate(label, 40));
            bar.inc(1);
        }
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_non_interactive() {
        let ctx = UiContext::non_interactive();
        let progress = ResolveProgress::new(&ctx, 3);
        progress.advance("https://example.com");
        progress.finish();
        // Should not panic
    }

    #[test]
    fn truncate_long_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
