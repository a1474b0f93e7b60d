//! The asset resolver shared by every host integration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fob_bridge_config::BridgeConfig;
use indexmap::IndexMap;

use crate::descriptor::{is_stylesheet, join_url, AssetDescriptor, AssetKind};
use crate::error::{Error, Result};
use crate::hot_file::{self, DevServerInfo};
use crate::lifecycle::{DevServerHandle, DevServerLifecycle, LifecycleState};
use crate::manifest::{Manifest, ManifestEntry, ManifestStore};
use crate::mode::{select_mode, ResolutionMode};

/// Path of the HMR client module on the dev server.
pub const DEV_CLIENT_PATH: &str = "@vite/client";

/// Per-call resolution options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Extra attributes applied to every script and style descriptor
    pub attributes: IndexMap<String, String>,
    /// Emit `modulepreload` descriptors for imported chunks (manifest mode)
    pub preload_imports: bool,
}

impl ResolveOptions {
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn preload_imports(mut self, preload: bool) -> Self {
        self.preload_imports = preload;
        self
    }
}

/// Resolves logical entry names to asset descriptors.
///
/// One instance is shared (behind an `Arc`) by the template helpers, the CSP
/// keywords and the request proxy. All read operations take `&self` and are
/// safe to call concurrently.
///
/// # Example
///
/// ```no_run
/// use fob_bridge::{AssetBridge, ResolveOptions};
/// use fob_bridge_config::BridgeConfig;
///
/// # fn main() -> fob_bridge::Result<()> {
/// let config = BridgeConfig::load(".")?;
/// let bridge = AssetBridge::new(config, ".");
/// for asset in bridge.resolve_entrypoints(&["resources/js/app.js"], &ResolveOptions::default())? {
///     println!("{:?} {}", asset.kind, asset.url);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AssetBridge {
    config: BridgeConfig,
    root: PathBuf,
    hot_file: PathBuf,
    manifests: ManifestStore,
    lifecycle: DevServerLifecycle,
    manage_dev_server: bool,
    degraded_reported: AtomicBool,
}

impl AssetBridge {
    /// Create a resolver for a project root. Relative config paths resolve
    /// against `root`.
    pub fn new(config: BridgeConfig, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let hot_file = config.hot_file_path(&root);
        let manifests = ManifestStore::new(config.manifest_path(&root));
        let lifecycle = DevServerLifecycle::new(
            config.dev_server.clone(),
            config.dev_server_cwd(&root),
            hot_file.clone(),
        );

        Self {
            config,
            root,
            hot_file,
            manifests,
            lifecycle,
            manage_dev_server: false,
            degraded_reported: AtomicBool::new(false),
        }
    }

    /// Allow this bridge to spawn the dev server. Without it,
    /// [`start_dev_server`](Self::start_dev_server) is a no-op. Ignored
    /// when the bridge is disabled in config.
    pub fn managing_dev_server(mut self, manage: bool) -> Self {
        self.manage_dev_server = manage && self.config.enabled;
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hot_file_path(&self) -> &Path {
        &self.hot_file
    }

    pub fn manifest_path(&self) -> &Path {
        self.manifests.path()
    }

    pub fn manifest_store(&self) -> &ManifestStore {
        &self.manifests
    }

    pub fn lifecycle(&self) -> &DevServerLifecycle {
        &self.lifecycle
    }

    pub fn manages_dev_server(&self) -> bool {
        self.manage_dev_server
    }

    /// Determine the active mode.
    ///
    /// The hot file is probed on every call; the manifest is cached until
    /// [`reload_manifest`](Self::reload_manifest) or [`invalidate`](Self::invalidate).
    pub fn mode(&self) -> ResolutionMode {
        let selection = select_mode(
            self.config.enabled,
            || hot_file::probe(&self.hot_file),
            || self.manifests.get_or_load(),
        );

        if let Some(err) = selection.degraded {
            if !self.degraded_reported.swap(true, Ordering::Relaxed) {
                tracing::warn!("{}; assets are disabled until a build exists", err);
            } else {
                tracing::debug!("{}", err);
            }
        } else {
            tracing::debug!(mode = selection.mode.name(), "selected resolution mode");
        }

        selection.mode
    }

    /// Resolve entries to ordered descriptors.
    ///
    /// Manifest mode, per entry: the entry file, its CSS, then the CSS of
    /// every transitively imported chunk (depth first), then preloads when
    /// requested. Descriptors already emitted are skipped.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` in manifest mode when a name is not in the manifest.
    pub fn resolve_entrypoints<S: AsRef<str>>(
        &self,
        entries: &[S],
        options: &ResolveOptions,
    ) -> Result<Vec<AssetDescriptor>> {
        match self.mode() {
            ResolutionMode::Disabled => Ok(Vec::new()),
            ResolutionMode::DevServer(info) => Ok(self.resolve_dev(&info, entries, options)),
            ResolutionMode::Manifest(manifest) => self.resolve_manifest(&manifest, entries, options),
        }
    }

    /// Resolve the configured default `entrypoints`.
    pub fn resolve_default_entrypoints(
        &self,
        options: &ResolveOptions,
    ) -> Result<Vec<AssetDescriptor>> {
        self.resolve_entrypoints(&self.config.entrypoints, options)
    }

    /// URL for a single asset path.
    ///
    /// # Errors
    ///
    /// - `DevServerUnavailable` if the dev server stopped advertising itself
    /// - `EntryNotFound` in manifest mode when the path is not in the manifest
    pub fn asset_url(&self, path: &str) -> Result<String> {
        match self.mode() {
            ResolutionMode::DevServer(info) => match hot_file::probe(&self.hot_file) {
                Some(current) if current.origin == info.origin => Ok(join_url(&info.origin, path)),
                _ => Err(Error::DevServerUnavailable {
                    origin: info.origin,
                }),
            },
            ResolutionMode::Manifest(manifest) => {
                let entry = manifest.lookup(path)?;
                Ok(join_url(&self.config.assets_url, &entry.file))
            }
            ResolutionMode::Disabled => Ok(join_url(&self.config.assets_url, path)),
        }
    }

    /// Dev-server origin, or an empty string outside dev-server mode.
    pub fn dev_url(&self) -> String {
        match self.mode() {
            ResolutionMode::DevServer(info) => info.origin,
            _ => String::new(),
        }
    }

    /// HMR websocket origin, or an empty string outside dev-server mode.
    pub fn hmr_url(&self) -> String {
        hot_file::to_websocket(&self.dev_url())
    }

    /// Absolute origin assets are served from, or empty when that is the
    /// application itself.
    pub fn asset_origin(&self) -> String {
        match self.mode() {
            ResolutionMode::DevServer(info) => info.origin,
            _ => {
                let url = self.config.assets_url.trim_end_matches('/');
                match DevServerInfo::from_url(url) {
                    Ok(_) => url.to_string(),
                    Err(_) => String::new(),
                }
            }
        }
    }

    /// Re-read the manifest from disk.
    ///
    /// In-flight resolutions keep the snapshot they started with.
    pub fn reload_manifest(&self) -> Result<Arc<Manifest>> {
        let manifest = self.manifests.reload()?;
        self.degraded_reported.store(false, Ordering::Relaxed);
        Ok(manifest)
    }

    /// Forget the cached manifest; the next resolution reloads it.
    pub fn invalidate(&self) {
        self.manifests.invalidate();
        self.degraded_reported.store(false, Ordering::Relaxed);
    }

    /// Start the dev server if this bridge manages one.
    pub async fn start_dev_server(&self) -> Result<Option<DevServerHandle>> {
        if !self.manage_dev_server {
            return Ok(None);
        }
        let result = self.lifecycle.start().await;
        self.invalidate();
        result.map(Some)
    }

    /// Stop the dev server. Never fails.
    pub async fn stop_dev_server(&self) {
        if !self.manage_dev_server {
            return;
        }
        self.lifecycle.stop().await;
        self.invalidate();
    }

    pub fn dev_server_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn resolve_dev<S: AsRef<str>>(
        &self,
        info: &DevServerInfo,
        entries: &[S],
        options: &ResolveOptions,
    ) -> Vec<AssetDescriptor> {
        let mut out = Emitter::default();
        out.push(
            AssetDescriptor::module_script(join_url(&info.origin, DEV_CLIENT_PATH))
                .with_attributes(&self.config.script_attributes),
        );

        for name in entries {
            let name = name.as_ref();
            let url = join_url(&info.origin, name);
            let descriptor = if is_stylesheet(name) {
                self.style(url, None, options)
            } else {
                self.script(url, None, options)
            };
            out.push(descriptor);
        }

        out.finish()
    }

    fn resolve_manifest<S: AsRef<str>>(
        &self,
        manifest: &Manifest,
        entries: &[S],
        options: &ResolveOptions,
    ) -> Result<Vec<AssetDescriptor>> {
        let mut out = Emitter::default();

        for name in entries {
            let name = name.as_ref();
            let entry = manifest.lookup(name)?;
            let url = self.asset(&entry.file);

            if is_stylesheet(&entry.file) {
                out.push(self.style(url, entry.integrity.as_deref(), options));
            } else {
                out.push(self.script(url, entry.integrity.as_deref(), options));
            }
            for css in &entry.css {
                out.push(self.style(self.asset(css), None, options));
            }

            let mut visited = HashSet::from([name]);
            let mut chunks = Vec::new();
            collect_imports(manifest, entry, &mut visited, &mut chunks);

            for chunk in &chunks {
                for css in &chunk.css {
                    out.push(self.style(self.asset(css), None, options));
                }
            }
            if options.preload_imports {
                for chunk in &chunks {
                    out.push(
                        AssetDescriptor::module_preload(self.asset(&chunk.file))
                            .with_integrity(chunk.integrity.as_deref()),
                    );
                }
            }
        }

        Ok(out.finish())
    }

    fn asset(&self, file: &str) -> String {
        join_url(&self.config.assets_url, file)
    }

    fn script(&self, url: String, integrity: Option<&str>, options: &ResolveOptions) -> AssetDescriptor {
        AssetDescriptor::module_script(url)
            .with_attributes(&self.config.script_attributes)
            .with_attributes(&options.attributes)
            .with_integrity(integrity)
    }

    fn style(&self, url: String, integrity: Option<&str>, options: &ResolveOptions) -> AssetDescriptor {
        AssetDescriptor::stylesheet(url)
            .with_attributes(&self.config.style_attributes)
            .with_attributes(&options.attributes)
            .with_integrity(integrity)
    }
}

/// Depth-first walk over static imports, each chunk at most once.
fn collect_imports<'m>(
    manifest: &'m Manifest,
    entry: &'m ManifestEntry,
    visited: &mut HashSet<&'m str>,
    chunks: &mut Vec<&'m ManifestEntry>,
) {
    for import in &entry.imports {
        if !visited.insert(import.as_str()) {
            continue;
        }
        match manifest.get(import) {
            Some(chunk) => {
                chunks.push(chunk);
                collect_imports(manifest, chunk, visited, chunks);
            }
            None => tracing::warn!(
                import = %import,
                manifest = %manifest.source().display(),
                "imported chunk missing from manifest"
            ),
        }
    }
}

/// Collects descriptors, keeping the first occurrence of each kind and URL.
///
/// A preload is dropped when its URL was already emitted in any form.
#[derive(Default)]
struct Emitter {
    urls: HashSet<String>,
    seen: HashSet<(AssetKind, String)>,
    out: Vec<AssetDescriptor>,
}

impl Emitter {
    fn push(&mut self, descriptor: AssetDescriptor) {
        if descriptor.kind == AssetKind::ModulePreload && self.urls.contains(&descriptor.url) {
            return;
        }
        if self.seen.insert((descriptor.kind, descriptor.url.clone())) {
            self.urls.insert(descriptor.url.clone());
            self.out.push(descriptor);
        }
    }

    fn finish(self) -> Vec<AssetDescriptor> {
        self.out
    }
}
