//! Schema-level validation (no filesystem checks).
//!
//! The build directory and manifest are allowed to be missing: a project that has never
//! been built still has to serve pages.

use crate::config::BridgeConfig;
use crate::error::{ConfigError, Result};

impl BridgeConfig {
    /// Validate option values.
    ///
    /// # Example
    ///
    /// ```
    /// use fob_bridge_config::BridgeConfig;
    ///
    /// let mut config = BridgeConfig::default();
    /// config.validate().unwrap();
    ///
    /// config.dev_server.command = "  ".into();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entrypoints {
            if entry.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "entrypoints",
                    "Remove empty strings from the 'entrypoints' array",
                ));
            }
        }

        if self.hot_file.as_os_str().is_empty() {
            return Err(ConfigError::invalid(
                "hotFile",
                "Point 'hotFile' at the file the dev server writes its URL to",
            ));
        }

        if self.dev_server.command.trim().is_empty() {
            return Err(ConfigError::invalid(
                "devServer.command",
                "Specify the executable that starts the dev server (e.g. 'npx')",
            ));
        }

        if self.dev_server.startup_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "devServer.startupTimeoutMs",
                "Use a positive number of milliseconds",
            ));
        }

        if self.dev_server.shutdown_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "devServer.shutdownTimeoutMs",
                "Use a positive number of milliseconds",
            ));
        }

        for prefix in &self.proxy.paths {
            if !prefix.starts_with('/') {
                return Err(ConfigError::invalid(
                    "proxy.paths",
                    format!("'{}' must start with '/'", prefix),
                ));
            }
        }

        Ok(())
    }
}
