//! Request forwarding through the dev proxy middleware.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use fob_bridge::{AssetBridge, DevProxy};
use fob_bridge_config::BridgeConfig;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

async fn spawn_dev_server() -> SocketAddr {
    let app = Router::new()
        .route("/@vite/client", get(|| async { "// hmr client" }))
        .route(
            "/resources/js/app.js",
            get(|req: Request<Body>| async move {
                format!(
                    "query={} header={}",
                    req.uri().query().unwrap_or(""),
                    req.headers().contains_key("x-forwarded-test")
                )
            }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn write_hot_file(root: &Path, origin: &str) {
    let dir = root.join("public/assets");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("hot.json"), format!(r#"{{"url":"{}"}}"#, origin)).unwrap();
}

fn host_app(root: &Path) -> Router {
    let mut config = BridgeConfig::default();
    config.proxy.paths.push("/resources/".into());
    let bridge = Arc::new(AssetBridge::new(config, root));

    let router = Router::new()
        .route("/", get(|| async { "home" }))
        .route("/@vite/client", get(|| async { "host fallback" }))
        .fallback(|| async { (StatusCode::NOT_FOUND, "host 404") });
    DevProxy::new(bridge).apply(router)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn forwards_matching_paths_in_dev_mode() {
    let addr = spawn_dev_server().await;
    let dir = TempDir::new().unwrap();
    write_hot_file(dir.path(), &format!("http://{}", addr));
    let app = host_app(dir.path());

    let response = app
        .clone()
        .oneshot(Request::get("/@vite/client").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "// hmr client");

    let response = app
        .oneshot(
            Request::get("/resources/js/app.js?t=42")
                .header("x-forwarded-test", "1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "query=t=42 header=true");
}

#[tokio::test]
async fn other_paths_fall_through() {
    let addr = spawn_dev_server().await;
    let dir = TempDir::new().unwrap();
    write_hot_file(dir.path(), &format!("http://{}", addr));
    let app = host_app(dir.path());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "home");
}

#[tokio::test]
async fn without_dev_server_host_handles_everything() {
    let dir = TempDir::new().unwrap();
    let app = host_app(dir.path());

    let response = app
        .oneshot(Request::get("/@vite/client").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "host fallback");
}

#[tokio::test]
async fn unreachable_dev_server_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = TempDir::new().unwrap();
    write_hot_file(dir.path(), &format!("http://{}", addr));
    let app = host_app(dir.path());

    let response = app
        .oneshot(Request::get("/@vite/client").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
