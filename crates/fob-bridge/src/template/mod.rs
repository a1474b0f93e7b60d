//! Template engine integration.
//!
//! Helpers return structured data (descriptor lists, URLs); turning that
//! into tags is left to the template.

#[cfg(feature = "minijinja")]
mod jinja;

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;
use crate::resolver::{AssetBridge, ResolveOptions};

/// Resolves the listed entries.
pub const ENTRYPOINTS_HELPER: &str = "vite_entrypoints";
/// Resolves the configured default entries.
pub const DEFAULT_ENTRYPOINTS_HELPER: &str = "vite_default_entrypoints";
/// URL of a single asset.
pub const ASSET_HELPER: &str = "vite_asset";
/// Dev-server origin, empty outside development.
pub const DEV_URL_HELPER: &str = "vite_dev_url";

/// Arguments passed to a helper by the template engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelperCall {
    pub entries: Vec<String>,
    pub attributes: IndexMap<String, String>,
    pub preload_imports: bool,
}

impl HelperCall {
    pub fn entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn options(&self) -> ResolveOptions {
        ResolveOptions {
            attributes: self.attributes.clone(),
            preload_imports: self.preload_imports,
        }
    }
}

pub type HelperFn = Arc<dyn Fn(&HelperCall) -> Result<Value> + Send + Sync>;

/// Host capability: a template engine that accepts named helpers.
pub trait TemplateEngine {
    fn register_helper(&mut self, name: &'static str, helper: HelperFn);
}

/// Register every bridge helper with `engine`.
pub fn register_helpers(engine: &mut dyn TemplateEngine, bridge: &Arc<AssetBridge>) {
    let b = Arc::clone(bridge);
    engine.register_helper(
        ENTRYPOINTS_HELPER,
        Arc::new(move |call: &HelperCall| -> Result<Value> {
            let assets = b.resolve_entrypoints(&call.entries, &call.options())?;
            Ok(serde_json::to_value(assets)?)
        }),
    );

    let b = Arc::clone(bridge);
    engine.register_helper(
        DEFAULT_ENTRYPOINTS_HELPER,
        Arc::new(move |call: &HelperCall| -> Result<Value> {
            let assets = b.resolve_default_entrypoints(&call.options())?;
            Ok(serde_json::to_value(assets)?)
        }),
    );

    let b = Arc::clone(bridge);
    engine.register_helper(
        ASSET_HELPER,
        Arc::new(move |call: &HelperCall| -> Result<Value> {
            let path = call.entries.first().map(String::as_str).unwrap_or_default();
            Ok(Value::String(b.asset_url(path)?))
        }),
    );

    let b = Arc::clone(bridge);
    engine.register_helper(
        DEV_URL_HELPER,
        Arc::new(move |_: &HelperCall| -> Result<Value> { Ok(Value::String(b.dev_url())) }),
    );

    tracing::debug!("registered template helpers");
}
