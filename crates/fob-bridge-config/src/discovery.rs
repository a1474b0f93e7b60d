//! File-based config discovery
//!
//! Handles finding and loading bridge configuration files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::BridgeConfig;
use crate::error::{ConfigError, Result};

/// Dedicated config file name.
pub const CONFIG_FILE_NAME: &str = "fob-bridge.toml";

/// Field read from `package.json` when no dedicated config file exists.
pub const PACKAGE_JSON_FIELD: &str = "fob-bridge";

/// File-based configuration discovery
///
/// Searches for bridge configuration files in conventional locations.
/// Library users can build a `BridgeConfig` directly instead.
///
/// # Example
///
/// ```no_run
/// use fob_bridge_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: fob-bridge.toml
    /// 2. package.json (`fob-bridge` field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE_NAME);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|field| !field.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from the discovered file only (no environment overrides).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<BridgeConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<BridgeConfig> {
        if Self::is_package_json(path) {
            return BridgeConfig::from_value(self.package_json_section(path)?);
        }

        let content = fs::read_to_string(path)?;

        let toml_val: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("Invalid TOML syntax: {}", e),
        })?;

        let value = serde_json::to_value(toml_val).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("TOML to JSON conversion failed: {}", e),
        })?;

        BridgeConfig::from_value(value)
    }

    pub(crate) fn is_package_json(path: &Path) -> bool {
        path.file_name() == Some(std::ffi::OsStr::new("package.json"))
    }

    /// Extract the `fob-bridge` object from a package.json file.
    pub(crate) fn package_json_section(&self, path: &Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;

        let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: format!("Invalid JSON: {}", e),
        })?;

        match parsed.get(PACKAGE_JSON_FIELD) {
            Some(Value::Object(section)) => Ok(Value::Object(section.clone())),
            Some(Value::Null) | None => Err(ConfigError::invalid(
                PACKAGE_JSON_FIELD,
                format!("Add a '{}' object to your package.json", PACKAGE_JSON_FIELD),
            )),
            Some(_) => Err(ConfigError::invalid(
                PACKAGE_JSON_FIELD,
                format!("The '{}' field must be an object", PACKAGE_JSON_FIELD),
            )),
        }
    }
}

/// Load config for the current directory with environment overrides (convenience function)
///
/// # Example
///
/// ```no_run
/// use fob_bridge_config::discover;
///
/// let config = discover().unwrap();
/// ```
pub fn discover() -> Result<BridgeConfig> {
    let root = std::env::current_dir()?;
    BridgeConfig::load(&root)
}
