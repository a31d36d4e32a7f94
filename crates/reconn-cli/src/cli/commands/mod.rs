//! CLI command handlers, one per file.

mod completions;
mod config;
mod probe;

pub use completions::run_completions;
pub use config::run_config;
pub use probe::{run_probe, ProbeOptions};
