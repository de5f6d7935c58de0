//! CLI command implementations

pub mod cache;
pub mod candidates;
pub mod config;
pub mod resolve;

pub use cache::execute as cache;
pub use candidates::execute as candidates;
pub use config::execute as config;
pub use resolve::execute as resolve;
