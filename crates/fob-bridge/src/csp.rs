//! Content-security-policy keywords.
//!
//! Keywords are registered as closures over the shared [`AssetBridge`] and
//! evaluated every time a policy is built, so a dev server that starts
//! mid-session is picked up by the next response.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::resolver::AssetBridge;

/// Asset origin: dev server or absolute CDN URL.
pub const VITE_URL: &str = "@viteUrl";
/// Dev-server origin.
pub const VITE_DEV_URL: &str = "@viteDevUrl";
/// HMR websocket origin.
pub const VITE_HMR_URL: &str = "@viteHmrUrl";

/// A keyword's value producer.
pub type KeywordFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Host capability: a CSP engine that accepts named keyword producers.
pub trait KeywordRegistry {
    fn register_keyword(&mut self, keyword: &'static str, value: KeywordFn);
}

/// Register the bridge keywords with a host registry.
pub fn register_keywords(registry: &mut dyn KeywordRegistry, bridge: &Arc<AssetBridge>) {
    let b = Arc::clone(bridge);
    registry.register_keyword(VITE_URL, Arc::new(move || b.asset_origin()));

    let b = Arc::clone(bridge);
    registry.register_keyword(VITE_DEV_URL, Arc::new(move || b.dev_url()));

    let b = Arc::clone(bridge);
    registry.register_keyword(VITE_HMR_URL, Arc::new(move || b.hmr_url()));
}

/// A minimal keyword registry that can expand policy strings.
#[derive(Default, Clone)]
pub struct CspKeywords {
    keywords: IndexMap<&'static str, KeywordFn>,
}

impl CspKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the bridge keywords.
    pub fn for_bridge(bridge: &Arc<AssetBridge>) -> Self {
        let mut keywords = Self::new();
        register_keywords(&mut keywords, bridge);
        keywords
    }

    /// Evaluate one keyword. `None` if it is not registered.
    pub fn value(&self, keyword: &str) -> Option<String> {
        self.keywords.get(keyword).map(|produce| produce())
    }

    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.keys().copied()
    }

    /// Evaluate every keyword, in registration order.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        self.keywords
            .iter()
            .map(|(name, produce)| (*name, produce()))
            .collect()
    }

    /// Replace keyword tokens in a policy.
    ///
    /// Directives are split on `;`, sources on whitespace. Keywords that
    /// evaluate to an empty string are dropped; unknown tokens are kept.
    pub fn expand(&self, policy: &str) -> String {
        policy
            .split(';')
            .map(str::trim)
            .filter(|directive| !directive.is_empty())
            .map(|directive| {
                directive
                    .split_whitespace()
                    .filter_map(|token| match self.keywords.get(token) {
                        Some(produce) => Some(produce()).filter(|value| !value.is_empty()),
                        None => Some(token.to_string()),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl KeywordRegistry for CspKeywords {
    fn register_keyword(&mut self, keyword: &'static str, value: KeywordFn) {
        self.keywords.insert(keyword, value);
    }
}

impl std::fmt::Debug for CspKeywords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CspKeywords")
            .field("keywords", &self.keywords.keys().collect::<Vec<_>>())
            .finish()
    }
}
