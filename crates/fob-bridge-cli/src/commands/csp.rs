//! Csp command implementation.

use std::path::Path;

use fob_bridge::CspKeywords;

use crate::cli::CspArgs;
use crate::commands::utils;
use crate::error::Result;

/// Execute the csp command.
///
/// With a policy, prints it with bridge keywords expanded. Without one,
/// prints each keyword and its current value (`-` when empty).
pub fn execute(args: CspArgs, cwd: &Path) -> Result<()> {
    let bridge = utils::load_bridge(cwd)?;
    let keywords = CspKeywords::for_bridge(&bridge);

    match args.policy {
        Some(policy) => println!("{}", keywords.expand(&policy)),
        None => {
            for (keyword, value) in keywords.values() {
                let value = if value.is_empty() { "-" } else { value.as_str() };
                println!("{keyword:<12} {value}");
            }
        }
    }
    Ok(())
}
