//! Build manifest loading and caching.
//!
//! The manifest maps logical entry names (usually source paths such as
//! `resources/js/app.js`) to the content-hashed files the bundler emitted.
//! A loaded [`Manifest`] is immutable; [`ManifestStore::reload`] replaces the
//! cached `Arc` wholesale so readers holding the old snapshot never observe a
//! partially updated manifest.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};

/// One emitted chunk or asset.
///
/// Unknown keys are ignored so newer bundler versions keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Emitted file, relative to the build directory
    pub file: String,

    /// Source path the entry was built from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub is_entry: bool,

    #[serde(default)]
    pub is_dynamic_entry: bool,

    /// Stylesheets this chunk needs, in load order
    #[serde(default)]
    pub css: Vec<String>,

    /// Manifest keys of statically imported chunks
    #[serde(default)]
    pub imports: Vec<String>,

    #[serde(default)]
    pub dynamic_imports: Vec<String>,

    #[serde(default)]
    pub assets: Vec<String>,

    /// Subresource integrity hash (`sha384-...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
}

/// A parsed build manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    entries: IndexMap<String, ManifestEntry>,
    source: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl Manifest {
    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// - `ManifestNotFound` if the file does not exist
    /// - `ManifestParse` if it is not JSON, not an object, or an entry is malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ManifestNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::io(format!("Failed to read manifest {}", path.display()), e),
        })?;
        Self::from_slice(&bytes, path)
    }

    /// Parse manifest JSON. `source` is only used for reporting.
    pub fn from_slice(bytes: &[u8], source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let parse_error = |message: String| Error::ManifestParse {
            path: source.clone(),
            message,
        };

        // IndexMap keeps entries in file order; serde_json's Map would sort them.
        let map: IndexMap<String, Value> = serde_json::from_slice(bytes).map_err(|e| {
            match serde_json::from_slice::<Value>(bytes) {
                Ok(value) if !value.is_object() => parse_error(format!(
                    "expected a top-level object, found {}",
                    json_kind(&value)
                )),
                _ => parse_error(e.to_string()),
            }
        })?;

        let mut entries = IndexMap::with_capacity(map.len());
        for (name, raw) in map {
            let entry: ManifestEntry = serde_json::from_value(raw)
                .map_err(|e| parse_error(format!("entry '{}': {}", name, e)))?;
            entries.insert(name, entry);
        }

        Ok(Self {
            entries,
            source,
            loaded_at: Utc::now(),
        })
    }

    /// Look up an entry by logical name.
    pub fn lookup(&self, name: &str) -> Result<&ManifestEntry> {
        self.entries.get(name).ok_or_else(|| Error::EntryNotFound {
            name: name.to_string(),
            manifest: self.source.clone(),
        })
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of entries flagged `isEntry`.
    pub fn entry_points(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_entry)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// In-memory manifest cache with single-writer replacement.
#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    current: RwLock<Option<Arc<Manifest>>>,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached snapshot, if one has been loaded.
    pub fn current(&self) -> Option<Arc<Manifest>> {
        self.current.read().clone()
    }

    /// Return the cached snapshot, loading it on first use.
    pub fn get_or_load(&self) -> Result<Arc<Manifest>> {
        if let Some(manifest) = self.current() {
            return Ok(manifest);
        }

        let mut slot = self.current.write();
        // Another writer may have loaded it while we waited for the lock
        if let Some(manifest) = slot.as_ref() {
            return Ok(Arc::clone(manifest));
        }

        let manifest = Arc::new(Manifest::load(&self.path)?);
        tracing::debug!(
            path = %self.path.display(),
            entries = manifest.len(),
            "loaded build manifest"
        );
        *slot = Some(Arc::clone(&manifest));
        Ok(manifest)
    }

    /// Re-read the manifest from disk and swap it in.
    ///
    /// On failure the previous snapshot stays cached.
    pub fn reload(&self) -> Result<Arc<Manifest>> {
        let manifest = Arc::new(Manifest::load(&self.path)?);
        *self.current.write() = Some(Arc::clone(&manifest));
        tracing::info!(
            path = %self.path.display(),
            entries = manifest.len(),
            "reloaded build manifest"
        );
        Ok(manifest)
    }

    /// Drop the cached snapshot so the next read goes to disk.
    pub fn invalidate(&self) {
        self.current.write().take();
    }

    /// Look up an entry in the (lazily loaded) manifest.
    pub fn lookup(&self, name: &str) -> Result<ManifestEntry> {
        self.get_or_load()?.lookup(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "resources/js/app.js": {
            "file": "assets/app-4ed993c7.js",
            "src": "resources/js/app.js",
            "isEntry": true,
            "css": ["assets/app-5c1b1c2a.css"],
            "imports": ["_vendor-11a2b3c4.js"],
            "someFutureField": {"anything": [1, 2, 3]}
        },
        "_vendor-11a2b3c4.js": {
            "file": "assets/vendor-11a2b3c4.js"
        }
    }"#;

    #[test]
    fn parses_entries_and_ignores_unknown_fields() {
        let manifest = Manifest::from_slice(MANIFEST.as_bytes(), "manifest.json").unwrap();
        assert_eq!(manifest.len(), 2);

        let app = manifest.lookup("resources/js/app.js").unwrap();
        assert_eq!(app.file, "assets/app-4ed993c7.js");
        assert!(app.is_entry);
        assert_eq!(app.css, vec!["assets/app-5c1b1c2a.css"]);
        assert_eq!(app.imports, vec!["_vendor-11a2b3c4.js"]);

        let vendor = manifest.lookup("_vendor-11a2b3c4.js").unwrap();
        assert!(!vendor.is_entry);
        assert!(vendor.css.is_empty());
    }

    #[test]
    fn entry_points_only_lists_entries() {
        let manifest = Manifest::from_slice(MANIFEST.as_bytes(), "manifest.json").unwrap();
        let entries: Vec<_> = manifest.entry_points().collect();
        assert_eq!(entries, vec!["resources/js/app.js"]);
    }

    #[test]
    fn entries_keep_file_order() {
        let json = br#"{
            "z.js": {"file": "assets/z.js", "isEntry": true},
            "m.js": {"file": "assets/m.js"},
            "a.js": {"file": "assets/a.js", "isEntry": true}
        }"#;
        let manifest = Manifest::from_slice(json, "manifest.json").unwrap();

        let names: Vec<_> = manifest.entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["z.js", "m.js", "a.js"]);
        let entry_points: Vec<_> = manifest.entry_points().collect();
        assert_eq!(entry_points, vec!["z.js", "a.js"]);
    }

    #[test]
    fn rejects_non_object_top_level() {
        let err = Manifest::from_slice(b"[1, 2]", "manifest.json").unwrap_err();
        match err {
            Error::ManifestParse { message, .. } => assert!(message.contains("an array")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_entry_without_file() {
        let err = Manifest::from_slice(br#"{"app.js": {"css": []}}"#, "m.json").unwrap_err();
        match err {
            Error::ManifestParse { message, .. } => assert!(message.contains("app.js")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_json() {
        let err = Manifest::from_slice(b"{not json", "m.json").unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }

    #[test]
    fn missing_file_is_manifest_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Manifest::load(dir.path().join("manifest.json")).unwrap_err();
        assert!(matches!(err, Error::ManifestNotFound { .. }));
    }

    #[test]
    fn lookup_missing_entry_is_entry_not_found() {
        let manifest = Manifest::from_slice(MANIFEST.as_bytes(), "manifest.json").unwrap();
        let err = manifest.lookup("missing-entry").unwrap_err();
        assert!(matches!(err, Error::EntryNotFound { ref name, .. } if name == "missing-entry"));
    }

    #[test]
    fn store_caches_until_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, r#"{"a.js": {"file": "assets/a-1.js"}}"#).unwrap();

        let store = ManifestStore::new(&path);
        assert!(store.current().is_none());

        let first = store.get_or_load().unwrap();
        assert_eq!(first.lookup("a.js").unwrap().file, "assets/a-1.js");

        fs::write(&path, r#"{"a.js": {"file": "assets/a-2.js"}}"#).unwrap();
        let cached = store.get_or_load().unwrap();
        assert!(Arc::ptr_eq(&first, &cached));

        let reloaded = store.reload().unwrap();
        assert_eq!(reloaded.lookup("a.js").unwrap().file, "assets/a-2.js");
        // Snapshots taken before the reload are untouched
        assert_eq!(first.lookup("a.js").unwrap().file, "assets/a-1.js");
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, r#"{"a.js": {"file": "assets/a-1.js"}}"#).unwrap();

        let store = ManifestStore::new(&path);
        store.get_or_load().unwrap();

        fs::write(&path, "garbage").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.lookup("a.js").unwrap().file, "assets/a-1.js");
    }

    #[test]
    fn invalidate_forces_reread() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, r#"{"a.js": {"file": "assets/a-1.js"}}"#).unwrap();

        let store = ManifestStore::new(&path);
        store.get_or_load().unwrap();
        store.invalidate();
        assert!(store.current().is_none());

        fs::remove_file(&path).unwrap();
        assert!(matches!(
            store.get_or_load().unwrap_err(),
            Error::ManifestNotFound { .. }
        ));
    }
}
