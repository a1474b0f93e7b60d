//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fob_bridge::AssetBridge;
use fob_bridge_config::BridgeConfig;

use crate::error::{CliError, Result};

/// Resolve `--cwd` to an absolute project root.
///
/// # Errors
///
/// `InvalidArgument` when the directory does not exist.
pub fn project_root(cwd: &Path) -> Result<PathBuf> {
    let root = if cwd.is_absolute() {
        cwd.to_path_buf()
    } else {
        std::env::current_dir()?.join(cwd)
    };

    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Project root is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

/// Load the project's configuration.
pub fn load_config(cwd: &Path) -> Result<(PathBuf, BridgeConfig)> {
    let root = project_root(cwd)?;
    let config = BridgeConfig::load(&root)?;
    Ok((root, config))
}

/// Build a bridge for one-shot commands. It never manages a dev server.
pub fn load_bridge(cwd: &Path) -> Result<Arc<AssetBridge>> {
    let (root, config) = load_config(cwd)?;
    Ok(Arc::new(AssetBridge::new(config, root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_root_absolute() {
        let dir = TempDir::new().unwrap();
        assert_eq!(project_root(dir.path()).unwrap(), dir.path());
    }

    #[test]
    fn test_project_root_missing() {
        let dir = TempDir::new().unwrap();
        let err = project_root(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn test_load_bridge_defaults_without_config() {
        let dir = TempDir::new().unwrap();
        let bridge = load_bridge(dir.path()).unwrap();
        assert!(!bridge.manages_dev_server());
        assert!(bridge.mode().is_disabled());
    }
}
