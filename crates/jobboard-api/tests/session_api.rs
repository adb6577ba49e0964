//! Session cookie and owner-check tests.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_jwt_sets_session_cookie() {
    let app = test_app();
    let response = post_json(&app, "/jwt", &json!({ "email": "hr@corp.io" })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_production_cookie_is_cross_site() {
    let app = test_app_with(jobboard_api::ApiConfig {
        environment: "production".to_string(),
        ..test_config()
    });
    let response = post_json(&app, "/jwt", &json!({ "email": "hr@corp.io" })).await;

    let cookie = set_cookie(&response);
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=None"));
}

#[tokio::test]
async fn test_jwt_rejects_bad_payload() {
    let app = test_app();

    let response = post_json(&app, "/jwt", &json!({ "email": "not-an-email" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["message"].is_string());

    let response = post_json(&app, "/jwt", &json!({ "name": "no email" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = test_app();
    let response = send(&app, empty_request(Method::POST, "/logout")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "success": true }));

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_owner_routes_require_cookie() {
    let app = test_app();

    for uri in ["/user-jobs/hr@corp.io", "/user-applications/hr@corp.io"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, json!({ "message": "Unauthorized access" }));
    }
}

#[tokio::test]
async fn test_owner_routes_reject_bad_token() {
    let app = test_app();

    let response = get_with_cookie(&app, "/user-jobs/hr@corp.io", "token=not.a.jwt").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Signed with another secret
    let other = test_app_with(jobboard_api::ApiConfig {
        jwt_secret: "someone-else".to_string(),
        ..test_config()
    });
    let foreign = login(&other, "hr@corp.io").await;
    let response = get_with_cookie(&app, "/user-jobs/hr@corp.io", &foreign).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Unauthorized access");
}

#[tokio::test]
async fn test_owner_routes_forbid_other_users() {
    let app = test_app();
    let cookie = login(&app, "mallory@corp.io").await;

    for uri in ["/user-jobs/hr@corp.io", "/user-applications/hr@corp.io"] {
        let response = get_with_cookie(&app, uri, &cookie).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.body, json!({ "message": "Forbidden access" }));
    }
}

#[tokio::test]
async fn test_user_jobs_returns_own_listings() {
    let app = test_app();
    create_job(&app, json!({ "title": "Mine", "hr_email": "hr@corp.io" })).await;
    create_job(&app, json!({ "title": "Theirs", "hr_email": "other@corp.io" })).await;

    let cookie = login(&app, "hr@corp.io").await;
    let response = get_with_cookie(&app, "/user-jobs/hr@corp.io", &cookie).await;

    assert_eq!(response.status, StatusCode::OK);
    let jobs = response.body.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Mine");
}

#[tokio::test]
async fn test_owner_routes_reject_recently_expired_token() {
    let app = test_app();
    let keys = jobboard_api::auth::SessionKeys::new(TEST_SECRET, std::time::Duration::from_secs(3600));
    let now = chrono::Utc::now().timestamp();
    let token = keys
        .sign(&jobboard_api::auth::SessionClaims {
            email: "hr@corp.io".to_string(),
            iat: now - 3600,
            exp: now - 5,
            extra: serde_json::Map::new(),
        })
        .unwrap();

    let cookie = format!("token={}", token);
    let response = get_with_cookie(&app, "/user-jobs/hr@corp.io", &cookie).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "message": "Unauthorized access" }));
}
