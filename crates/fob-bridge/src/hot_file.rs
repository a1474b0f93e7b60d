//! Dev-server marker detection.
//!
//! The bundler writes a small JSON file (`{"url": "http://localhost:5173"}`)
//! while its dev server is listening. Absence of the file is the normal
//! production state.

use axum::http::Uri;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Snapshot of a detected dev server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerInfo {
    /// `scheme://host[:port]`, no trailing slash
    pub origin: String,
    pub secure: bool,
    pub detected_at: DateTime<Utc>,
}

impl DevServerInfo {
    /// Parse an advertised URL into a dev-server snapshot.
    ///
    /// Only absolute `http`/`https` URLs are accepted. Any path on the URL is
    /// dropped; the origin is what assets are served from.
    pub fn from_url(url: &str) -> Result<Self, String> {
        let uri: Uri = url
            .trim()
            .parse()
            .map_err(|e| format!("invalid url '{}': {}", url, e))?;

        let secure = match uri.scheme_str() {
            Some("http") => false,
            Some("https") => true,
            Some(other) => return Err(format!("unsupported scheme '{}'", other)),
            None => return Err(format!("url '{}' is not absolute", url)),
        };
        let authority = uri
            .authority()
            .filter(|a| !a.host().is_empty())
            .ok_or_else(|| format!("url '{}' has no host", url))?;

        let scheme = if secure { "https" } else { "http" };
        Ok(Self {
            origin: format!("{}://{}", scheme, authority.as_str()),
            secure,
            detected_at: Utc::now(),
        })
    }

    /// Origin with the scheme swapped for the websocket equivalent.
    pub fn hmr_origin(&self) -> String {
        to_websocket(&self.origin)
    }
}

/// Swap `http` for `ws` and `https` for `wss`. Other strings pass through.
pub fn to_websocket(origin: &str) -> String {
    if let Some(rest) = origin.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = origin.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        origin.to_string()
    }
}

/// Result of inspecting the marker file.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Absent,
    Detected(DevServerInfo),
    /// The file exists but could not be understood
    Malformed(String),
}

impl ProbeOutcome {
    pub fn into_info(self) -> Option<DevServerInfo> {
        match self {
            Self::Detected(info) => Some(info),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct HotFile {
    url: String,
}

/// Inspect the marker file without logging.
pub fn inspect(path: &Path) -> ProbeOutcome {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ProbeOutcome::Absent,
        Err(e) => return ProbeOutcome::Malformed(format!("unreadable: {}", e)),
    };

    let hot: HotFile = match serde_json::from_str(&content) {
        Ok(hot) => hot,
        Err(e) => return ProbeOutcome::Malformed(e.to_string()),
    };

    match DevServerInfo::from_url(&hot.url) {
        Ok(info) => ProbeOutcome::Detected(info),
        Err(reason) => ProbeOutcome::Malformed(reason),
    }
}

/// Detect a dev server, treating a malformed marker as absent.
///
/// Malformed markers are logged at `warn` so a stale file is visible
/// without breaking page rendering.
pub fn probe(path: &Path) -> Option<DevServerInfo> {
    match inspect(path) {
        ProbeOutcome::Detected(info) => Some(info),
        ProbeOutcome::Absent => None,
        ProbeOutcome::Malformed(reason) => {
            let err = Error::HotFileMalformed {
                path: path.to_path_buf(),
                reason,
            };
            tracing::warn!("{}; assuming no dev server", err);
            None
        }
    }
}
