//! Error types for asset resolution and dev-server supervision.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the bridge.
///
/// `HotFileMalformed` is a soft condition: resolution APIs recover from it as
/// "no dev server detected" and only report it through [`crate::ProbeOutcome`].
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Build manifest does not exist
    #[error("Build manifest not found: {}", .path.display())]
    #[diagnostic(
        code(fob_bridge::manifest_not_found),
        help("Run the production build, or start the dev server so the hot file is written")
    )]
    ManifestNotFound { path: PathBuf },

    /// Build manifest exists but is not a valid manifest
    #[error("Invalid build manifest {}: {message}", .path.display())]
    #[diagnostic(
        code(fob_bridge::manifest_parse),
        help("The manifest must be a JSON object keyed by entry name")
    )]
    ManifestParse { path: PathBuf, message: String },

    /// Requested entry is missing from the manifest
    #[error("Entry '{name}' not found in manifest {}", .manifest.display())]
    #[diagnostic(
        code(fob_bridge::entry_not_found),
        help("Add the entry to the bundler's build inputs and rebuild")
    )]
    EntryNotFound { name: String, manifest: PathBuf },

    /// Dev server process failed before becoming ready
    #[error("Dev server failed to start: {reason}")]
    #[diagnostic(
        code(fob_bridge::dev_server_start_failure),
        help("Check the devServer command and that the bundler writes the hot file")
    )]
    DevServerStartFailure { reason: String },

    /// Dev server stopped advertising itself between mode selection and use
    #[error("Dev server at {origin} is no longer available")]
    #[diagnostic(code(fob_bridge::dev_server_unavailable))]
    DevServerUnavailable { origin: String },

    /// Hot file exists but cannot be understood
    #[error("Malformed hot file {}: {reason}", .path.display())]
    #[diagnostic(
        code(fob_bridge::hot_file_malformed),
        severity(Warning),
        help("Delete the stale hot file or restart the dev server")
    )]
    HotFileMalformed { path: PathBuf, reason: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    #[diagnostic(code(fob_bridge::config))]
    Config(#[from] fob_bridge_config::ConfigError),

    /// Descriptor could not be converted for a template engine
    #[error("Serialization error: {0}")]
    #[diagnostic(code(fob_bridge::serialization))]
    Serialization(#[from] serde_json::Error),

    /// I/O error with context message
    #[error("{message}")]
    #[diagnostic(code(fob_bridge::io))]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for bridge operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn start_failure(reason: impl Into<String>) -> Self {
        Self::DevServerStartFailure {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}
