//! Check command implementation.
//!
//! Reports where configuration came from, what the hot file and build
//! manifest look like, and which resolution mode a request would use.

use std::path::Path;

use fob_bridge::hot_file::{self, ProbeOutcome};
use fob_bridge::{AssetBridge, Error, Manifest};
use fob_bridge_config::ConfigDiscovery;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Status lines go to stderr; the active mode is printed to stdout.
///
/// # Errors
///
/// Fails when the configuration is invalid or the build manifest exists but
/// cannot be parsed. A missing manifest or hot file is only reported.
pub fn execute(_args: CheckArgs, cwd: &Path) -> Result<()> {
    let (root, config) = utils::load_config(cwd)?;

    match ConfigDiscovery::new(&root).find() {
        Some(path) => ui::success(&format!("Configuration loaded from {}", path.display())),
        None => ui::info("No configuration file found, using defaults"),
    }

    let bridge = AssetBridge::new(config, &root);
    if !bridge.config().enabled {
        ui::warning("Bridge is disabled; no assets will be emitted");
    }

    report_hot_file(&bridge);
    let manifest_error = report_manifest(&bridge);

    println!("mode: {}", bridge.mode());

    match manifest_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn report_hot_file(bridge: &AssetBridge) {
    let path = bridge.hot_file_path();
    match hot_file::inspect(path) {
        ProbeOutcome::Absent => ui::info(&format!("No hot file at {}", path.display())),
        ProbeOutcome::Detected(info) => {
            ui::success(&format!("Dev server advertised at {}", info.origin))
        }
        ProbeOutcome::Malformed(reason) => ui::warning(&format!(
            "Ignoring malformed hot file {}: {}",
            path.display(),
            reason
        )),
    }
}

fn report_manifest(bridge: &AssetBridge) -> Option<Error> {
    match Manifest::load(bridge.manifest_path()) {
        Ok(manifest) => {
            let entry_points = manifest.entry_points().count();
            ui::success(&format!(
                "Build manifest {} ({} chunks, {} entrypoints)",
                manifest.source().display(),
                manifest.len(),
                entry_points
            ));
            for name in &bridge.config().entrypoints {
                if manifest.get(name).is_none() {
                    ui::warning(&format!("Configured entrypoint '{}' is not in the manifest", name));
                }
            }
            None
        }
        Err(Error::ManifestNotFound { path }) => {
            ui::info(&format!("No build manifest at {}", path.display()));
            None
        }
        Err(err) => {
            ui::error(&err.to_string());
            Some(err)
        }
    }
}
