//! Tracing subscriber wiring.
//!
//! Every crate in the workspace emits `tracing` events; only this binary
//! installs a subscriber. Output goes to stderr so stdout carries nothing
//! but command results.

use tracing_subscriber::EnvFilter;

use crate::args::LogFormat;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
