//! Error handling for the fob-bridge CLI.
//!
//! Library errors from `fob-bridge` already carry `miette` diagnostics and are
//! passed through untouched. Everything else the CLI can hit (arguments,
//! templates, the reference server) is wrapped in [`CliError`] and turned
//! into a report in `main` via [`cli_error_to_miette`].

mod report;

use thiserror::Error;

pub use fob_bridge_config::ConfigError;
pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Resolution, manifest, and dev-server errors from the bridge
    #[error(transparent)]
    Bridge(#[from] fob_bridge::Error),

    /// Configuration discovery or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reference server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
