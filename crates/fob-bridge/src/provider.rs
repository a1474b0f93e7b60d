//! Application integration.
//!
//! [`BridgeProvider`] owns the one shared [`AssetBridge`] for a host process
//! and drives it through the host's register / boot / shutdown phases.

use std::path::Path;
use std::sync::Arc;

use fob_bridge_config::BridgeConfig;

use crate::csp::{register_keywords, KeywordRegistry};
use crate::environment::AppEnvironment;
use crate::error::Result;
use crate::lifecycle::DevServerHandle;
use crate::middleware::DevProxy;
use crate::resolver::AssetBridge;
use crate::template::{register_helpers, TemplateEngine};

/// Optional integrations a host may offer.
///
/// Each accessor returns `None` when the host does not have that
/// integration; the bridge then skips it.
pub trait HostCapabilities {
    fn template_engine(&mut self) -> Option<&mut dyn TemplateEngine> {
        None
    }

    fn csp_registry(&mut self) -> Option<&mut dyn KeywordRegistry> {
        None
    }
}

/// What [`BridgeProvider::boot`] wired up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootReport {
    pub template_helpers: bool,
    pub csp_keywords: bool,
    pub dev_server: Option<DevServerHandle>,
}

#[derive(Debug)]
pub struct BridgeProvider {
    bridge: Arc<AssetBridge>,
    environment: AppEnvironment,
}

impl BridgeProvider {
    /// Build the shared bridge. Dev-server management is enabled only when
    /// the bridge is enabled and the environment calls for it.
    pub fn register(config: BridgeConfig, root: impl AsRef<Path>, environment: AppEnvironment) -> Self {
        let run_dev_server = config.enabled && environment.should_run_dev_server();
        let bridge = AssetBridge::new(config, root).managing_dev_server(run_dev_server);
        tracing::debug!(
            mode = %environment.mode,
            process = ?environment.process,
            run_dev_server,
            "registered asset bridge"
        );

        Self {
            bridge: Arc::new(bridge),
            environment,
        }
    }

    pub fn bridge(&self) -> Arc<AssetBridge> {
        Arc::clone(&self.bridge)
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn runs_dev_server(&self) -> bool {
        self.bridge.manages_dev_server()
    }

    /// Register host integrations and start the dev server when applicable.
    ///
    /// # Errors
    ///
    /// `DevServerStartFailure` when the dev server was required and could
    /// not start.
    pub async fn boot(&self, host: &mut dyn HostCapabilities) -> Result<BootReport> {
        let mut report = BootReport::default();

        if let Some(engine) = host.template_engine() {
            register_helpers(engine, &self.bridge);
            report.template_helpers = true;
        }
        if let Some(registry) = host.csp_registry() {
            register_keywords(registry, &self.bridge);
            report.csp_keywords = true;
        }

        report.dev_server = self.bridge.start_dev_server().await?;

        tracing::info!(
            template_helpers = report.template_helpers,
            csp_keywords = report.csp_keywords,
            dev_server = report.dev_server.is_some(),
            "asset bridge booted"
        );
        Ok(report)
    }

    /// Request forwarding for the host router, when a dev server is managed.
    pub fn dev_proxy(&self) -> Option<DevProxy> {
        self.runs_dev_server()
            .then(|| DevProxy::new(Arc::clone(&self.bridge)))
    }

    /// Stop the dev server. Never fails.
    pub async fn shutdown(&self) {
        self.bridge.stop_dev_server().await;
    }
}
