//! Console logging setup
//!
//! Installs a `tracing` subscriber writing timestamped, level-tagged lines to
//! stdout. Components never hold a logger of their own; they emit through
//! whatever subscriber is installed, so tests can scope a different one with
//! `tracing::subscriber::with_default`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Choose the filter for the given verbosity flags
///
/// Precedence: `--verbose`, `--quiet`, `RUST_LOG`, then INFO for this crate
/// and WARN for dependencies.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("warn,catalog_crawler=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,catalog_crawler=info"))
    }
}

/// Install the global subscriber; call once, before the first log line
pub fn init_logger(verbose: bool, quiet: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stdout);

    // try_init so a second call (tests, embedding) is a no-op
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}
