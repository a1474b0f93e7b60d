//! Configuration for the fob bundler bridge.
//!
//! [`BridgeConfig`] describes where the bundler writes its build output, where a running
//! dev server advertises itself, and how that dev server is spawned. Configuration can be
//! built programmatically ([`BridgeConfig::from_value`]) or discovered on disk
//! ([`ConfigDiscovery`], [`BridgeConfig::load`]).

pub mod config;
pub mod dev;
pub mod discovery;
pub mod error;
pub mod validation;

// Re-export main types
pub use config::*;
pub use dev::*;
pub use error::*;

pub use discovery::{discover, ConfigDiscovery, CONFIG_FILE_NAME, PACKAGE_JSON_FIELD};
