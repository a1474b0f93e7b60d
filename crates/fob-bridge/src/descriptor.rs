//! Resolved asset descriptors handed to templates.

use indexmap::IndexMap;
use serde::Serialize;

/// Kind of tag a descriptor should be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Style,
    /// Bare URL (images, fonts)
    Url,
    #[serde(rename = "modulepreload")]
    ModulePreload,
}

/// One resolved asset: what to render, where it lives, and its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDescriptor {
    pub kind: AssetKind,
    pub url: String,
    pub attributes: IndexMap<String, String>,
}

impl AssetDescriptor {
    pub fn new(kind: AssetKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            attributes: IndexMap::new(),
        }
    }

    /// `<script type="module">`
    pub fn module_script(url: impl Into<String>) -> Self {
        Self::new(AssetKind::Script, url).with_attribute("type", "module")
    }

    /// `<link rel="stylesheet">`
    pub fn stylesheet(url: impl Into<String>) -> Self {
        Self::new(AssetKind::Style, url).with_attribute("rel", "stylesheet")
    }

    /// `<link rel="modulepreload">`
    pub fn module_preload(url: impl Into<String>) -> Self {
        Self::new(AssetKind::ModulePreload, url).with_attribute("rel", "modulepreload")
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Merge attributes; later values override earlier ones.
    pub fn with_attributes<'a>(
        mut self,
        attributes: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        for (name, value) in attributes {
            self.attributes.insert(name.clone(), value.clone());
        }
        self
    }

    /// Attach a subresource integrity hash.
    pub fn with_integrity(self, integrity: Option<&str>) -> Self {
        match integrity {
            Some(hash) => self
                .with_attribute("integrity", hash)
                .with_attribute("crossorigin", "anonymous"),
            None => self,
        }
    }
}

/// File extensions served as stylesheets.
pub const STYLE_EXTENSIONS: &[&str] = &[
    "css", "scss", "sass", "less", "styl", "stylus", "pcss", "postcss",
];

/// Whether a path or entry name refers to a stylesheet.
pub fn is_stylesheet(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit_once('.')
        .map(|(_, ext)| STYLE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Join a URL prefix and a relative path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
