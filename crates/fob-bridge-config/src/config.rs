//! High-level configuration structure for the bundler bridge.
//!
//! This module provides the main `BridgeConfig` struct and its layered loading.
//! For file discovery, see the `discovery` module.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dev::{DevServerConfig, ProxyConfig};
use crate::discovery::ConfigDiscovery;
use crate::error::{ConfigError, Result as ConfigResult};

/// Prefix for environment variable overrides (`FOB_BRIDGE_ENABLED=false`).
pub const ENV_PREFIX: &str = "FOB_BRIDGE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Master switch. When off, asset resolution yields nothing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_build_directory")]
    pub build_directory: PathBuf,

    #[serde(default = "default_hot_file")]
    pub hot_file: PathBuf,

    /// Overrides `<buildDirectory>/.vite/manifest.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_file: Option<PathBuf>,

    /// URL prefix for built files. May be an absolute CDN URL.
    #[serde(default = "default_assets_url")]
    pub assets_url: String,

    #[serde(default)]
    pub entrypoints: Vec<String>,

    #[serde(default)]
    pub script_attributes: IndexMap<String, String>,

    #[serde(default)]
    pub style_attributes: IndexMap<String, String>,

    #[serde(default)]
    pub dev_server: DevServerConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            build_directory: default_build_directory(),
            hot_file: default_hot_file(),
            manifest_file: None,
            assets_url: default_assets_url(),
            entrypoints: Vec::new(),
            script_attributes: IndexMap::new(),
            style_attributes: IndexMap::new(),
            dev_server: DevServerConfig::default(),
            proxy: ProxyConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use fob_bridge_config::BridgeConfig;
    /// use serde_json::json;
    ///
    /// let config = BridgeConfig::from_value(json!({
    ///     "entrypoints": ["resources/js/app.js"],
    ///     "assetsUrl": "https://cdn.example.com/assets"
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.entrypoints, vec!["resources/js/app.js".to_string()]);
    /// assert!(config.enabled);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Load configuration for a project root.
    ///
    /// Priority: environment variables > discovered config file > defaults.
    /// A missing config file is not an error; defaults apply.
    pub fn load(root: impl AsRef<Path>) -> ConfigResult<Self> {
        let discovery = ConfigDiscovery::new(root);
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = discovery.find() {
            tracing::debug!(path = %path.display(), "loading bridge config");
            figment = if ConfigDiscovery::is_package_json(&path) {
                figment.merge(Serialized::defaults(discovery.package_json_section(&path)?))
            } else {
                figment.merge(Toml::file(&path))
            };
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .lowercase(false)
                .map(|key| env_key_to_path(key.as_str()).into()),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Location of the build manifest relative to `root`.
    pub fn manifest_path(&self, root: &Path) -> PathBuf {
        match &self.manifest_file {
            Some(file) => resolve(root, file),
            None => resolve(root, &self.build_directory)
                .join(".vite")
                .join("manifest.json"),
        }
    }

    /// Location of the dev-server hot file relative to `root`.
    pub fn hot_file_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.hot_file)
    }

    /// Working directory for the dev-server process.
    pub fn dev_server_cwd(&self, root: &Path) -> PathBuf {
        match &self.dev_server.cwd {
            Some(cwd) => resolve(root, cwd),
            None => root.to_path_buf(),
        }
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// `DEV_SERVER__STARTUP_TIMEOUT_MS` -> `devServer.startupTimeoutMs`
fn env_key_to_path(key: &str) -> String {
    key.split("__")
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            let mut upper = false;
            for ch in segment.chars() {
                if ch == '_' {
                    upper = true;
                } else if upper {
                    out.extend(ch.to_uppercase());
                    upper = false;
                } else {
                    out.extend(ch.to_lowercase());
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn default_enabled() -> bool {
    true
}

fn default_build_directory() -> PathBuf {
    PathBuf::from("public/assets")
}

fn default_hot_file() -> PathBuf {
    PathBuf::from("public/assets/hot.json")
}

fn default_assets_url() -> String {
    "/assets".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_creates_config() {
        let config = BridgeConfig::from_value(json!({
            "enabled": false,
            "buildDirectory": "dist",
            "entrypoints": ["src/main.ts"],
            "devServer": { "command": "pnpm", "args": ["exec", "vite"] }
        }))
        .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.build_directory, PathBuf::from("dist"));
        assert_eq!(config.entrypoints, vec!["src/main.ts".to_string()]);
        assert_eq!(config.dev_server.command, "pnpm");
        assert_eq!(config.dev_server.startup_timeout_ms, 30_000);
    }

    #[test]
    fn from_value_rejects_wrong_types() {
        let err = BridgeConfig::from_value(json!({ "enabled": "sometimes" })).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn to_value_serializes_camel_case() {
        let value = BridgeConfig::default().to_value().unwrap();
        assert_eq!(value["assetsUrl"], json!("/assets"));
        assert_eq!(value["devServer"]["shutdownTimeoutMs"], json!(5000));
        assert!(value.get("manifestFile").is_none());
    }

    #[test]
    fn manifest_path_defaults_under_build_directory() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.manifest_path(Path::new("/app")),
            PathBuf::from("/app/public/assets/.vite/manifest.json")
        );
    }

    #[test]
    fn manifest_file_overrides_location() {
        let config = BridgeConfig {
            manifest_file: Some(PathBuf::from("/srv/manifest.json")),
            ..BridgeConfig::default()
        };
        assert_eq!(
            config.manifest_path(Path::new("/app")),
            PathBuf::from("/srv/manifest.json")
        );
    }

    #[test]
    fn hot_file_path_resolves_against_root() {
        let config = BridgeConfig::default();
        assert_eq!(
            config.hot_file_path(Path::new("/app")),
            PathBuf::from("/app/public/assets/hot.json")
        );
    }

    #[test]
    fn env_keys_map_to_camel_case_paths() {
        assert_eq!(env_key_to_path("ENABLED"), "enabled");
        assert_eq!(env_key_to_path("ASSETS_URL"), "assetsUrl");
        assert_eq!(
            env_key_to_path("DEV_SERVER__STARTUP_TIMEOUT_MS"),
            "devServer.startupTimeoutMs"
        );
    }
}
