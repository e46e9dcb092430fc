#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use commons_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use commons_db::Database;
use http_body_util::BodyExt;
use tower::ServiceExt;

use commons_api::auth::jwt::{generate_access_token, JwtConfig};
use commons_api::config::ServerConfig;
use commons_api::router::build_app_router;
use commons_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router on a fresh in-memory store.
///
/// The returned router shares its store across clones, so a test can clone
/// it for each request and observe earlier writes.
pub fn build_test_app() -> Router {
    build_test_app_with(Database::memory())
}

pub fn build_test_app_with(db: Database) -> Router {
    let config = test_config();
    let state = AppState {
        db,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config).unwrap()
}

/// Bearer header value for a token carrying `role`.
pub fn bearer(role: &str) -> String {
    let token = generate_access_token(uuid::Uuid::now_v7(), role, &test_config().jwt).unwrap();
    format!("Bearer {token}")
}

pub fn admin_bearer() -> String {
    bearer(ROLE_ADMIN)
}

pub fn member_bearer() -> String {
    bearer(ROLE_MEMBER)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    auth: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body), None).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PATCH, uri, Some(body), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None, None).await
}

/// Read the full body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a row and return its JSON, asserting a 201.
pub async fn create(app: &Router, uri: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app.clone(), uri, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
