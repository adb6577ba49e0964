//! Health, CORS and middleware tests.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};

use common::*;

#[tokio::test]
async fn test_root_banner() {
    let app = test_app();
    let response = get(&app, "/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "My server is running");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let response = get(&app, "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert!(response.body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ready_pings_store() {
    let app = test_app();
    let response = get(&app, "/ready").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ready");
    assert_eq!(response.body["checks"]["store"]["backend"], "memory");
}

#[tokio::test]
async fn test_metrics_disabled_without_handle() {
    let app = test_app();
    let response = get(&app, "/metrics").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_credentialed_front_end() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/jobs")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(
        response.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let app = test_app();
    let request = Request::builder()
        .uri("/jobs")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .headers
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_request_id_and_security_headers() {
    let app = test_app();
    let request = Request::builder()
        .uri("/health")
        .header("X-Request-ID", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.headers["x-request-id"], "req-123");
    assert_eq!(response.headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let response = get(&app, "/health").await;
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = test_app_with(jobboard_api::ApiConfig {
        max_body_size: 64,
        ..test_config()
    });
    let big = "x".repeat(1024);
    let response = post_json(&app, "/jobs", &serde_json::json!({ "title": big })).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}
