//! Asset command implementation.

use std::path::Path;

use crate::cli::AssetArgs;
use crate::commands::utils;
use crate::error::Result;

/// Execute the asset command: print the public URL of one source asset.
pub fn execute(args: AssetArgs, cwd: &Path) -> Result<()> {
    let bridge = utils::load_bridge(cwd)?;
    let url = bridge.asset_url(&args.path)?;
    println!("{url}");
    Ok(())
}
