use clap::{Args, Subcommand};

use super::enums::{EnvironmentArg, OutputFormat};
use super::validation::parse_attribute;

/// Policy applied by `serve` when `--csp` is not given.
pub const DEFAULT_POLICY: &str = "default-src 'self'; \
    script-src 'self' @viteUrl; \
    style-src 'self' 'unsafe-inline' @viteUrl; \
    img-src 'self' data: @viteUrl; \
    connect-src 'self' @viteDevUrl @viteHmrUrl";

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve entrypoints to script, stylesheet, and preload descriptors
    ///
    /// Uses the running dev server when its hot file is present, otherwise the
    /// build manifest. With no entries, the configured entrypoints are resolved.
    Resolve(ResolveArgs),

    /// Print the public URL of a single asset
    Asset(AssetArgs),

    /// Show security-policy keyword values, or expand a policy
    Csp(CspArgs),

    /// Report the active resolution mode and the state of the hot file and manifest
    Check(CheckArgs),

    /// Run a reference host application wired through the bridge
    ///
    /// Boots the bridge provider, spawns the dev server in development and test,
    /// proxies dev-server paths, and renders a page with the template helpers.
    Serve(ServeArgs),
}

/// Arguments for the resolve command
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Entrypoints to resolve, e.g. resources/js/app.ts
    #[arg(value_name = "ENTRY")]
    pub entries: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Emit module preloads for imported chunks
    #[arg(long)]
    pub preload: bool,

    /// Extra attribute for every tag (repeatable, bare KEY for boolean attributes)
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,
}

/// Arguments for the asset command
#[derive(Args, Debug)]
pub struct AssetArgs {
    /// Source path of the asset, e.g. resources/images/logo.svg
    pub path: String,
}

/// Arguments for the csp command
#[derive(Args, Debug, Default)]
pub struct CspArgs {
    /// Policy to expand; prints every keyword value when omitted
    pub policy: Option<String>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Application environment (defaults to APP_ENV / NODE_ENV)
    #[arg(long, value_enum)]
    pub env: Option<EnvironmentArg>,

    /// Content-Security-Policy template; keywords are expanded per request
    #[arg(long, default_value = DEFAULT_POLICY)]
    pub csp: String,
}
