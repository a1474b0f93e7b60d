//! Serve command: a reference host application.
//!
//! Shows every integration point of the bridge in one place. The provider
//! registers template helpers and CSP keywords with the host, spawns the dev
//! server in development, and the dev proxy is layered over the router.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use fob_bridge::{
    AppEnvironment, AssetBridge, BridgeProvider, CspKeywords, DevProxy, HostCapabilities,
    KeywordRegistry, TemplateEngine,
};
use minijinja::{context, Environment};
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::cli::{EnvironmentArg, ServeArgs};
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::html::{self, PAGE_TEMPLATE};
use crate::ui;

const PAGE_TITLE: &str = "fob-bridge";

/// Template engine and keyword registry offered to the provider.
pub struct ReferenceHost {
    templates: Environment<'static>,
    keywords: CspKeywords,
}

impl ReferenceHost {
    pub fn new() -> Result<Self> {
        Ok(Self {
            templates: html::environment()?,
            keywords: CspKeywords::new(),
        })
    }
}

impl HostCapabilities for ReferenceHost {
    fn template_engine(&mut self) -> Option<&mut dyn TemplateEngine> {
        Some(&mut self.templates)
    }

    fn csp_registry(&mut self) -> Option<&mut dyn KeywordRegistry> {
        Some(&mut self.keywords)
    }
}

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    bridge: Arc<AssetBridge>,
    templates: Arc<Environment<'static>>,
    keywords: Arc<CspKeywords>,
    policy: Arc<str>,
}

impl AppState {
    /// Freeze a booted host into request state.
    pub fn new(bridge: Arc<AssetBridge>, host: ReferenceHost, policy: &str) -> Self {
        Self {
            bridge,
            templates: Arc::new(host.templates),
            keywords: Arc::new(host.keywords),
            policy: Arc::from(policy),
        }
    }
}

/// Execute the serve command.
///
/// # Errors
///
/// Fails when the dev server is required but cannot start, or when the
/// address cannot be bound. The dev server is stopped on every exit path
/// after a successful boot.
pub async fn execute(args: ServeArgs, cwd: &Path) -> Result<()> {
    let (root, config) = utils::load_config(cwd)?;
    let environment = environment_for(args.env);
    let provider = BridgeProvider::register(config, &root, environment);

    let mut host = ReferenceHost::new()?;
    let report = provider.boot(&mut host).await?;
    match &report.dev_server {
        Some(handle) => ui::success(&format!("Dev server running at {}", handle.origin)),
        None => ui::info(&format!(
            "Not managing a dev server ({} mode)",
            provider.environment().mode
        )),
    }

    let result = run(&args, &provider, host).await;
    provider.shutdown().await;
    result
}

fn environment_for(env: Option<EnvironmentArg>) -> AppEnvironment {
    let detected = AppEnvironment::from_env();
    match env {
        Some(mode) => AppEnvironment::new(mode.into(), detected.process),
        None => detected,
    }
}

async fn run(args: &ServeArgs, provider: &BridgeProvider, host: ReferenceHost) -> Result<()> {
    let state = AppState::new(provider.bridge(), host, &args.csp);
    let app = build_router(state, provider.dev_proxy());

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", addr, e)))?;
    ui::success(&format!("Serving on http://{}", listener.local_addr()?));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CliError::Server(e.to_string()))
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => ui::info("Shutting down..."),
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Page route plus the dev proxy when one is active.
pub fn build_router(state: AppState, proxy: Option<DevProxy>) -> Router {
    let router = Router::new()
        .route("/", get(render_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match proxy {
        Some(proxy) => proxy.apply(router),
        None => router,
    }
}

async fn render_page(State(state): State<AppState>) -> Response {
    let policy = state.keywords.expand(&state.policy);
    let page = state.templates.get_template(PAGE_TEMPLATE).and_then(|template| {
        template.render(context! {
            title => PAGE_TITLE,
            mode => state.bridge.mode().name(),
        })
    });

    match page {
        Ok(body) => ([(header::CONTENT_SECURITY_POLICY, policy)], Html(body)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err)).into_response()
        }
    }
}
