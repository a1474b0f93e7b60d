//! Resolve command implementation.

use std::path::Path;

use fob_bridge::{AssetDescriptor, ResolveOptions};

use crate::cli::{OutputFormat, ResolveArgs};
use crate::commands::utils;
use crate::error::Result;
use crate::html;

/// Execute the resolve command.
///
/// Prints the descriptors for the requested entries (or the configured
/// defaults) to stdout.
///
/// # Errors
///
/// `EntryNotFound` when an entry is missing from the build manifest.
pub fn execute(args: ResolveArgs, cwd: &Path) -> Result<()> {
    let bridge = utils::load_bridge(cwd)?;

    let mut options = ResolveOptions::default().preload_imports(args.preload);
    for (name, value) in args.attributes {
        options = options.with_attribute(name, value);
    }

    let assets = if args.entries.is_empty() {
        bridge.resolve_default_entrypoints(&options)?
    } else {
        bridge.resolve_entrypoints(&args.entries, &options)?
    };
    tracing::debug!(count = assets.len(), "resolved entrypoints");

    println!("{}", render(&assets, args.format)?);
    Ok(())
}

/// Format descriptors for output.
pub fn render(assets: &[AssetDescriptor], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(assets)?),
        OutputFormat::Html => html::render_tags(assets),
    }
}
