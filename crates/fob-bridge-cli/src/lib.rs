//! fob-bridge CLI.
//!
//! Command-line access to the asset bridge plus a reference host
//! application showing how a web backend wires it in.
//!
//! - [`cli`] - Argument definitions
//! - [`commands`] - `resolve`, `asset`, `csp`, `check`, and `serve`
//! - [`error`] - CLI errors and miette conversion
//! - [`html`] - Tag and page templates
//! - [`logger`] - Tracing subscriber setup
//! - [`ui`] - Status lines on stderr
//!
//! # Example
//!
//! ```rust,no_run
//! use fob_bridge_cli::{cli::ResolveArgs, commands, error::Result, logger};
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     let args = ResolveArgs {
//!         entries: vec!["resources/js/app.js".into()],
//!         ..ResolveArgs::default()
//!     };
//!     commands::resolve_execute(args, Path::new("."))
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod html;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
