//! Health endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["backend"], "memory");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_method_returns_405() {
    let app = common::build_test_app();
    let response = common::send(
        app,
        Method::PATCH,
        &format!("/api/v1/categoriesTags/tags/{}", common::new_id()),
        None,
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    let id_str = request_id.to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id_str).is_ok());
}

#[tokio::test]
async fn incoming_request_id_is_propagated() {
    let app = common::build_test_app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/categoriesTags/tags")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "PATCH")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn groups_are_routed_by_their_camel_case_names() {
    let app = common::build_test_app();
    for uri in [
        "/api/v1/categoriesTags/tags",
        "/api/v1/attendance/attendanceMethods",
        "/api/v1/threadsPosts/pollVotes",
        "/api/v1/discussionBoard/engagementStats",
    ] {
        assert_eq!(get(app.clone(), uri).await.status(), StatusCode::OK, "{uri}");
    }
    for uri in [
        "/api/v1/categories-tags/tags",
        "/api/v1/attendance/attendance-methods",
        "/api/v1/threads-posts/poll-votes",
    ] {
        assert_eq!(get(app.clone(), uri).await.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}
