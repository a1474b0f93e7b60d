//! # fob-bridge
//!
//! Connects a server-rendered web application to a frontend bundler.
//!
//! In development the bundler's dev server advertises itself through a hot
//! file and assets are served straight from it. In production a build
//! manifest maps logical entry names to the content-hashed files the
//! bundler emitted. [`AssetBridge`] picks between the two on every request
//! (or emits nothing when disabled) and hands templates ordered
//! [`AssetDescriptor`]s.
//!
//! ## Quick start
//!
//! ```no_run
//! use fob_bridge::{AppEnvironment, BridgeProvider, CspKeywords, HostCapabilities, KeywordRegistry};
//! use fob_bridge_config::BridgeConfig;
//!
//! struct Host {
//!     csp: CspKeywords,
//! }
//!
//! impl HostCapabilities for Host {
//!     fn csp_registry(&mut self) -> Option<&mut dyn KeywordRegistry> {
//!         Some(&mut self.csp)
//!     }
//! }
//!
//! # async fn run() -> fob_bridge::Result<()> {
//! let config = BridgeConfig::load(".")?;
//! let provider = BridgeProvider::register(config, ".", AppEnvironment::from_env());
//!
//! let mut host = Host { csp: CspKeywords::new() };
//! provider.boot(&mut host).await?;
//!
//! let policy = host.csp.expand("script-src 'self' @viteUrl; connect-src @viteHmrUrl");
//! println!("{policy}");
//!
//! provider.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `minijinja` (default): `TemplateEngine` for `minijinja::Environment`
//! - `logging`: [`logging::init_logging`] for hosts without a subscriber

pub mod csp;
pub mod descriptor;
pub mod environment;
pub mod error;
pub mod hot_file;
pub mod lifecycle;
pub mod manifest;
pub mod middleware;
pub mod mode;
pub mod provider;
pub mod resolver;
pub mod template;

#[cfg(feature = "logging")]
pub mod logging;

pub use csp::{CspKeywords, KeywordFn, KeywordRegistry, VITE_DEV_URL, VITE_HMR_URL, VITE_URL};
pub use descriptor::{AssetDescriptor, AssetKind};
pub use environment::{AppEnvironment, AppMode, ProcessKind};
pub use error::{Error, Result};
pub use hot_file::{DevServerInfo, ProbeOutcome};
pub use lifecycle::{DevServerHandle, DevServerLifecycle, LifecycleState};
pub use manifest::{Manifest, ManifestEntry, ManifestStore};
pub use middleware::DevProxy;
pub use mode::ResolutionMode;
pub use provider::{BootReport, BridgeProvider, HostCapabilities};
pub use resolver::{AssetBridge, ResolveOptions};
pub use template::{HelperCall, HelperFn, TemplateEngine};

/// Re-exported so hosts can build a config without a direct dependency.
pub use fob_bridge_config as config;
