//! Command-line interface definition for fob-bridge.
//!
//! - `fob-bridge resolve` - Resolve entrypoints to asset descriptors
//! - `fob-bridge asset` - Resolve a single asset URL
//! - `fob-bridge csp` - Show or expand security-policy keywords
//! - `fob-bridge check` - Report the active resolution mode
//! - `fob-bridge serve` - Run a reference host application

mod commands;
mod enums;
mod validation;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{AssetArgs, CheckArgs, Command, CspArgs, ResolveArgs, ServeArgs, DEFAULT_POLICY};
pub use enums::{EnvironmentArg, OutputFormat};
pub use validation::parse_attribute;

/// Fob bridge - connect a web backend to the bundler's dev server and build manifest
#[derive(Parser, Debug)]
#[command(
    name = "fob-bridge",
    version,
    about = "Connect a web backend to the bundler's dev server and build manifest",
    long_about = "fob-bridge resolves bundler entrypoints into script, stylesheet, and preload tags.\n\
                  It follows a running dev server when its hot file is present and falls back to the\n\
                  production build manifest otherwise."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root containing fob-bridge.toml or package.json
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
