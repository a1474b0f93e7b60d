//! Dev-server process and request forwarding configuration types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How the bundler dev server is spawned and supervised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    #[serde(default = "default_command")]
    pub command: String,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Working directory for the process. Relative paths resolve against the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub env: IndexMap<String, String>,

    /// Maximum time to wait for the hot file to appear after spawning.
    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,

    /// Maximum time to wait for a graceful exit before force-killing.
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

impl DevServerConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            cwd: None,
            env: IndexMap::new(),
            startup_timeout_ms: default_startup_timeout_ms(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

/// Request paths forwarded to the dev server while it is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    /// Path prefixes forwarded in addition to the bundler's internal ones.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Forward the bundler's internal paths (`/@vite/`, `/@fs/`, ...).
    #[serde(default = "default_true")]
    pub internal_paths: bool,
}

impl ProxyConfig {
    /// Every prefix that should be forwarded, internal ones first.
    pub fn prefixes(&self) -> Vec<String> {
        let mut prefixes = Vec::new();
        if self.internal_paths {
            prefixes.extend(INTERNAL_PROXY_PATHS.iter().map(|p| p.to_string()));
        }
        for path in &self.paths {
            if !prefixes.contains(path) {
                prefixes.push(path.clone());
            }
        }
        prefixes
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            internal_paths: true,
        }
    }
}

/// Paths served by the bundler dev server itself.
pub const INTERNAL_PROXY_PATHS: &[&str] = &[
    "/@vite/",
    "/@id/",
    "/@fs/",
    "/@react-refresh",
    "/node_modules/",
    "/__vite_ping",
];

fn default_command() -> String {
    "npx".into()
}

fn default_args() -> Vec<String> {
    vec!["vite".into()]
}

fn default_startup_timeout_ms() -> u64 {
    30_000
}

fn default_shutdown_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}
