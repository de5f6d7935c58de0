//! Terminal output for the favi CLI
//!
//! Fancy output (colour, spinners) is used only on an interactive terminal;
//! everything falls back to plain, line-oriented text for pipes and CI.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{confirm, key_value, section, step_info, step_ok, step_warn, step_warn_hint};
pub use progress::ResolveProgress;
