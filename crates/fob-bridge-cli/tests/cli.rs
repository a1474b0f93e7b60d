//! End-to-end tests for the `fob-bridge` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;

const MANIFEST: &str = r#"{
    "resources/js/app.js": {
        "file": "app-abc123.js",
        "isEntry": true,
        "css": ["app-def456.css"],
        "imports": ["_vendor.js"]
    },
    "_vendor.js": {
        "file": "vendor-789.js"
    },
    "resources/images/logo.svg": {
        "file": "logo-111.svg"
    }
}"#;

fn fob_bridge(root: &Path) -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("fob-bridge");
    let mut cmd = Command::new(bin);
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--cwd")
        .arg(root.as_os_str());
    cmd
}

fn write_manifest(root: &Path) {
    let dir = root.join("public/assets/.vite");
    fs::create_dir_all(&dir).expect("create manifest dir");
    fs::write(dir.join("manifest.json"), MANIFEST).expect("write manifest");
}

fn write_hot_file(root: &Path, contents: &str) {
    let dir = root.join("public/assets");
    fs::create_dir_all(&dir).expect("create build dir");
    fs::write(dir.join("hot.json"), contents).expect("write hot file");
}

#[test]
fn resolve_prints_manifest_descriptors_as_json() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());

    let output = fob_bridge(root.path())
        .args(["resolve", "resources/js/app.js"])
        .output()
        .expect("run fob-bridge");
    assert!(output.status.success());

    let assets: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let urls: Vec<&str> = assets
        .as_array()
        .expect("array")
        .iter()
        .map(|a| a["url"].as_str().expect("url"))
        .collect();
    assert_eq!(urls, vec!["/assets/app-abc123.js", "/assets/app-def456.css"]);
    assert_eq!(assets[0]["kind"], "script");
    assert_eq!(assets[1]["kind"], "style");
}

#[test]
fn resolve_html_with_preload_and_attributes() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());

    fob_bridge(root.path())
        .args([
            "resolve",
            "resources/js/app.js",
            "--format",
            "html",
            "--preload",
            "--attr",
            "data-turbo-track=reload",
        ])
        .assert()
        .success()
        .stdout(contains(
            r#"<script src="/assets/app-abc123.js" type="module" data-turbo-track="reload"></script>"#,
        ))
        .stdout(contains(r#"<link href="/assets/vendor-789.js" rel="modulepreload""#));
}

#[test]
fn resolve_follows_dev_server() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());
    write_hot_file(root.path(), r#"{"url":"http://localhost:5173"}"#);

    fob_bridge(root.path())
        .args(["resolve", "resources/js/app.js", "--format", "html"])
        .assert()
        .success()
        .stdout(contains(r#"src="http://localhost:5173/@vite/client""#))
        .stdout(contains(r#"src="http://localhost:5173/resources/js/app.js""#))
        .stdout(contains("app-abc123").not());
}

#[test]
fn resolve_missing_entry_fails() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());

    fob_bridge(root.path())
        .args(["resolve", "resources/js/missing.js"])
        .assert()
        .failure()
        .stderr(contains("resources/js/missing.js"));
}

#[test]
fn resolve_without_build_prints_empty_list() {
    let root = tempfile::tempdir().expect("tempdir");

    fob_bridge(root.path())
        .args(["resolve", "resources/js/app.js"])
        .assert()
        .success()
        .stdout(contains("[]"));
}

#[test]
fn asset_resolves_through_manifest() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());

    fob_bridge(root.path())
        .args(["asset", "resources/images/logo.svg"])
        .assert()
        .success()
        .stdout("/assets/logo-111.svg\n");
}

#[test]
fn csp_expands_policy() {
    let root = tempfile::tempdir().expect("tempdir");
    write_hot_file(root.path(), r#"{"url":"https://localhost:5173"}"#);

    fob_bridge(root.path())
        .args(["csp", "connect-src 'self' @viteHmrUrl; script-src @viteUrl"])
        .assert()
        .success()
        .stdout("connect-src 'self' wss://localhost:5173; script-src https://localhost:5173\n");
}

#[test]
fn csp_lists_keywords() {
    let root = tempfile::tempdir().expect("tempdir");

    fob_bridge(root.path())
        .arg("csp")
        .assert()
        .success()
        .stdout(contains("@viteUrl"))
        .stdout(contains("@viteDevUrl"))
        .stdout(contains("@viteHmrUrl"));
}

#[test]
fn check_reports_mode() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());

    fob_bridge(root.path())
        .arg("check")
        .assert()
        .success()
        .stdout(contains("mode: manifest"))
        .stderr(contains("3 chunks"));
}

#[test]
fn check_warns_about_malformed_hot_file() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());
    write_hot_file(root.path(), "not json");

    fob_bridge(root.path())
        .arg("check")
        .assert()
        .success()
        .stdout(contains("mode: manifest"))
        .stderr(contains("malformed hot file"));
}

#[test]
fn check_fails_on_invalid_manifest() {
    let root = tempfile::tempdir().expect("tempdir");
    let dir = root.path().join("public/assets/.vite");
    fs::create_dir_all(&dir).expect("create manifest dir");
    fs::write(dir.join("manifest.json"), "[1, 2, 3]").expect("write manifest");

    fob_bridge(root.path()).arg("check").assert().failure();
}

#[test]
fn config_file_changes_assets_url() {
    let root = tempfile::tempdir().expect("tempdir");
    write_manifest(root.path());
    fs::write(
        root.path().join("fob-bridge.toml"),
        "assetsUrl = \"https://cdn.example.com/build\"\n",
    )
    .expect("write config");

    fob_bridge(root.path())
        .args(["asset", "resources/images/logo.svg"])
        .assert()
        .success()
        .stdout("https://cdn.example.com/build/logo-111.svg\n");
}

#[test]
fn missing_project_root_is_an_argument_error() {
    let root = tempfile::tempdir().expect("tempdir");

    fob_bridge(&root.path().join("missing"))
        .arg("check")
        .assert()
        .failure()
        .stderr(contains("Invalid argument"));
}
