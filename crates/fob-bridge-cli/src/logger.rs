//! Logging setup for the fob-bridge CLI.
//!
//! The bridge crates only emit `tracing` events; this installs the subscriber
//! that prints them.
//!
//! 1. `--verbose`: debug level for the fob-bridge crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG` when set
//! 4. Default: info level for the fob-bridge crates
//!
//! # Example
//!
//! ```rust,no_run
//! use fob_bridge_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("resolving entrypoints");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str = "fob_bridge=debug,fob_bridge_config=debug,fob_bridge_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "fob_bridge=info,fob_bridge_config=info,fob_bridge_cli=info";

/// Build the filter for the given flags.
pub fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so that `resolve` and `csp` output on stdout stays
/// machine-readable.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}
