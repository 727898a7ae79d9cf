//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` wins; otherwise
//! `--verbose` turns on debug events and the project's `log_level` applies.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "staffbook=debug";

/// Picks the filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool, configured: Option<&str>) -> &str {
    if verbose {
        VERBOSE_FILTER
    } else {
        configured.unwrap_or(DEFAULT_FILTER)
    }
}

/// Installs the global subscriber; later calls are no-ops
pub fn init(verbose: bool, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, configured)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
