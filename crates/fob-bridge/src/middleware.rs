//! Request forwarding to the dev server.
//!
//! Installed by the host in development. Requests whose path starts with one
//! of the configured prefixes are sent to the dev-server origin while the
//! bridge is in dev-server mode; everything else reaches the host's own
//! handlers untouched.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode, Uri},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::mode::ResolutionMode;
use crate::resolver::AssetBridge;

type ProxyClient = Client<HttpConnector, Body>;

/// Shared state for the forwarding middleware.
#[derive(Clone)]
pub struct DevProxy {
    bridge: Arc<AssetBridge>,
    prefixes: Arc<[String]>,
    client: ProxyClient,
}

impl DevProxy {
    /// Forward the prefixes from the bridge's proxy config.
    pub fn new(bridge: Arc<AssetBridge>) -> Self {
        let prefixes = bridge.config().proxy.prefixes();
        Self::with_prefixes(bridge, prefixes)
    }

    pub fn with_prefixes(bridge: Arc<AssetBridge>, prefixes: Vec<String>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            bridge,
            prefixes: prefixes.into(),
            client,
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Wrap `router` with the forwarding middleware.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(from_fn_with_state(self, forward_to_dev_server))
    }

    async fn forward(&self, origin: &str, req: Request) -> Response {
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let target = format!("{}{}", origin, path_and_query);
        let uri: Uri = match target.parse() {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(url = %target, "invalid dev server url: {}", e);
                return bad_gateway(format!("Invalid dev server url: {}", e));
            }
        };

        let (parts, body) = req.into_parts();
        let mut forwarded = Request::new(body);
        *forwarded.method_mut() = parts.method;
        *forwarded.uri_mut() = uri;
        *forwarded.headers_mut() = parts.headers;
        forwarded.headers_mut().remove(header::HOST);

        tracing::debug!(method = %forwarded.method(), uri = %forwarded.uri(), "forwarding to dev server");

        match self.client.request(forwarded).await {
            Ok(res) => res.map(Body::new),
            Err(e) => {
                tracing::error!(origin, "dev server proxy error: {}", e);
                bad_gateway(format!("Dev server proxy error: {}", e))
            }
        }
    }
}

impl std::fmt::Debug for DevProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevProxy")
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}

/// Middleware function installed by [`DevProxy::apply`].
pub async fn forward_to_dev_server(
    State(proxy): State<DevProxy>,
    req: Request,
    next: Next,
) -> Response {
    if !proxy.matches(req.uri().path()) {
        return next.run(req).await;
    }

    match proxy.bridge.mode() {
        ResolutionMode::DevServer(info) => proxy.forward(&info.origin, req).await,
        _ => next.run(req).await,
    }
}

fn bad_gateway(message: String) -> Response {
    (StatusCode::BAD_GATEWAY, message).into_response()
}
