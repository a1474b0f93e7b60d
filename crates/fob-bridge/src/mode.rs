//! Resolution mode selection.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hot_file::DevServerInfo;
use crate::manifest::Manifest;

/// How assets are resolved for the current request.
#[derive(Debug, Clone)]
pub enum ResolutionMode {
    /// No assets are emitted
    Disabled,
    /// A live dev server serves assets
    DevServer(DevServerInfo),
    /// A build manifest maps entries to emitted files
    Manifest(Arc<Manifest>),
}

impl ResolutionMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::DevServer(_) => "dev-server",
            Self::Manifest(_) => "manifest",
        }
    }

    pub fn dev_server(&self) -> Option<&DevServerInfo> {
        match self {
            Self::DevServer(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DevServer(info) => write!(f, "dev-server ({})", info.origin),
            Self::Manifest(manifest) => write!(f, "manifest ({})", manifest.source().display()),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}

/// Outcome of [`select_mode`]: the mode plus the error that forced a
/// fallback to `Disabled`, if any.
#[derive(Debug)]
pub struct ModeSelection {
    pub mode: ResolutionMode,
    pub degraded: Option<Error>,
}

/// Pick the active mode.
///
/// Evaluated in order: the enabled flag, the dev-server probe, then the
/// manifest. The probe and loader are only invoked when needed, so a
/// disabled bridge never touches the filesystem.
pub fn select_mode<P, L>(enabled: bool, probe: P, load_manifest: L) -> ModeSelection
where
    P: FnOnce() -> Option<DevServerInfo>,
    L: FnOnce() -> Result<Arc<Manifest>>,
{
    if !enabled {
        return ModeSelection {
            mode: ResolutionMode::Disabled,
            degraded: None,
        };
    }

    if let Some(info) = probe() {
        return ModeSelection {
            mode: ResolutionMode::DevServer(info),
            degraded: None,
        };
    }

    match load_manifest() {
        Ok(manifest) => ModeSelection {
            mode: ResolutionMode::Manifest(manifest),
            degraded: None,
        },
        Err(err) => ModeSelection {
            mode: ResolutionMode::Disabled,
            degraded: Some(err),
        },
    }
}
