//! Tests for default values and edge cases.

use fob_bridge_config::{BridgeConfig, DevServerConfig, ProxyConfig, INTERNAL_PROXY_PATHS};
use std::path::PathBuf;

#[test]
fn bridge_config_defaults() {
    let config = BridgeConfig::default();
    assert!(config.enabled);
    assert_eq!(config.build_directory, PathBuf::from("public/assets"));
    assert_eq!(config.hot_file, PathBuf::from("public/assets/hot.json"));
    assert!(config.manifest_file.is_none());
    assert_eq!(config.assets_url, "/assets");
    assert!(config.entrypoints.is_empty());
    assert!(config.script_attributes.is_empty());
    assert!(config.style_attributes.is_empty());
}

#[test]
fn dev_server_defaults() {
    let dev = DevServerConfig::default();
    assert_eq!(dev.command, "npx");
    assert_eq!(dev.args, vec!["vite".to_string()]);
    assert!(dev.cwd.is_none());
    assert!(dev.env.is_empty());
    assert_eq!(dev.startup_timeout_ms, 30_000);
    assert_eq!(dev.shutdown_timeout_ms, 5_000);
}

#[test]
fn proxy_defaults_forward_internal_paths() {
    let proxy = ProxyConfig::default();
    assert!(proxy.paths.is_empty());
    assert_eq!(proxy.prefixes().len(), INTERNAL_PROXY_PATHS.len());
}

#[test]
fn empty_object_deserializes_to_defaults() {
    let config = BridgeConfig::from_value(serde_json::json!({})).unwrap();
    assert_eq!(config, BridgeConfig::default());
}

#[test]
fn unknown_fields_are_ignored() {
    let config = BridgeConfig::from_value(serde_json::json!({
        "assetsUrl": "/build",
        "somethingNew": { "nested": true }
    }))
    .unwrap();
    assert_eq!(config.assets_url, "/build");
}
