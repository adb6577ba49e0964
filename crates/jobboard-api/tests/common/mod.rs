//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use jobboard_api::{create_router, ApiConfig, AppState};
use jobboard_store::MemoryStore;

pub const TEST_SECRET: &str = "integration-secret";

pub fn test_config() -> ApiConfig {
    ApiConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..Default::default()
    }
}

/// Router over a fresh in-memory store.
pub fn test_app() -> Router {
    test_app_with(test_config())
}

pub fn test_app_with(config: ApiConfig) -> Router {
    let state = AppState::with_store(config, Arc::new(MemoryStore::new()));
    create_router(state, None)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
        text,
    }
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, empty_request(Method::GET, uri)).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    send(app, json_request(Method::POST, uri, body)).await
}

/// Log in as `email` and return the `name=value` pair for a `Cookie` header.
pub async fn login(app: &Router, email: &str) -> String {
    let response = post_json(app, "/jwt", &serde_json::json!({ "email": email })).await;
    assert_eq!(response.status, StatusCode::OK);
    set_cookie(&response)
        .split(';')
        .next()
        .unwrap()
        .trim()
        .to_string()
}

pub fn set_cookie(response: &TestResponse) -> String {
    response
        .headers
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Create a job and return its id.
pub async fn create_job(app: &Router, job: Value) -> String {
    let response = post_json(app, "/jobs", &job).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text);
    response.body["insertedId"].as_str().unwrap().to_string()
}
