// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — CLI
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Command-line front end: argument parsing and the generation pipeline.

pub mod args;
pub mod pipeline;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,epoch_core=info,epoch_io=info,epoch_cli=debug")
    });

    fmt().with_env_filter(filter).with_target(false).init();
}
