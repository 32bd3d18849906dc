// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use mockito::ServerGuard;
use reqwest::Client;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use linkmeta_server::{
    auth::API_KEY_HEADER,
    handlers,
    resolver::{Resolver, ResolverConfig},
    state::AppState,
};

pub const TEST_API_KEY: &str = "test-api-key";

/// Resolver config whose provider endpoints live on the mock server.
pub fn mock_resolver_config(server: &ServerGuard, data_api_key: Option<&str>) -> ResolverConfig {
    ResolverConfig {
        oembed_endpoint: Url::parse(&format!("{}/oembed", server.url())).unwrap(),
        data_api_endpoint: Url::parse(&format!("{}/youtube/v3/videos", server.url())).unwrap(),
        data_api_key: data_api_key.map(String::from),
        ..ResolverConfig::default()
    }
}

/// HTTP client that sends `www.youtube.com` traffic to the mock server.
pub fn mock_client(server: &ServerGuard) -> Client {
    let addr: SocketAddr = server.host_with_port().parse().unwrap();
    Client::builder()
        .no_proxy()
        .resolve("www.youtube.com", addr)
        .build()
        .unwrap()
}

/// A YouTube URL on the mock server's port, routed there by `mock_client`.
pub fn youtube_url(server: &ServerGuard, path_and_query: &str) -> String {
    let addr: SocketAddr = server.host_with_port().parse().unwrap();
    format!("http://www.youtube.com:{}{}", addr.port(), path_and_query)
}

/// Build the application router wired to a resolver that talks to `server`.
pub fn create_test_app(server: &ServerGuard, data_api_key: Option<&str>) -> Router {
    let resolver = Resolver::with_client(
        mock_client(server),
        mock_resolver_config(server, data_api_key),
    );
    let state = AppState {
        resolver: Arc::new(resolver),
        api_key: Arc::from(TEST_API_KEY),
    };
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metadata", get(handlers::metadata::get_metadata))
        .with_state(state)
}

/// `/metadata` URI for `target`, percent-encoded.
pub fn metadata_uri(target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("/metadata?url={encoded}")
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn get_with_key(app: Router, uri: &str, key: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(API_KEY_HEADER, key)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn get_authed(app: Router, uri: &str) -> (StatusCode, Value) {
    get_with_key(app, uri, TEST_API_KEY).await
}

pub async fn get_no_auth(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
