//! Router-level tests that need no database
//!
//! Everything here exercises paths that answer before any query runs:
//! infrastructure routes, request validation, and the auth guard on the
//! payment routes.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, body_text, TestApp};

#[tokio::test]
async fn test_root_returns_greeting() {
    let app = TestApp::without_database();

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Hello starter");
}

#[tokio::test]
async fn test_health_reports_version() {
    let app = TestApp::without_database();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], serde_json::json!("healthy"));
    assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::without_database();

    let response = app.get("/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_job_rejects_empty_title() {
    let app = TestApp::without_database();

    let response = app
        .post_json(
            "/api/jobs",
            &serde_json::json!({"title": "", "description": "something"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], serde_json::json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_create_job_rejects_missing_description() {
    let app = TestApp::without_database();

    let response = app
        .post_json("/api/jobs", &serde_json::json!({"title": "a title"}))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_job_rejects_malformed_json() {
    let app = TestApp::without_database();

    let response = app
        .send_json(
            Method::POST,
            "/api/jobs",
            &serde_json::json!("not an object"),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_routes_require_a_bearer_session() {
    let app = TestApp::without_database();

    let response = app
        .post_json(
            "/api/payments/create-payment-intent",
            &serde_json::json!({"amount": 500, "currency": "usd"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_json(
            "/api/payments/create-subscription",
            &serde_json::json!({"priceId": "price_123"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Nothing reached the gateway
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_sign_up_validates_before_touching_storage() {
    let app = TestApp::without_database();

    let response = app
        .post_json(
            "/api/auth/sign-up/email",
            &serde_json::json!({
                "name": "Test User",
                "email": "not-an-email",
                "password": "longenough",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json(
            "/api/auth/sign-up/email",
            &serde_json::json!({
                "name": "Test User",
                "email": "user@example.com",
                "password": "short",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_otp_rejects_unknown_type() {
    let app = TestApp::without_database();

    let response = app
        .post_json(
            "/api/auth/email-otp/send-verification-otp",
            &serde_json::json!({"email": "user@example.com", "type": "magic-link"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
