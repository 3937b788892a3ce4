//! End-to-end workflows over a real Postgres database
//!
//! These tests run only when `TEST_DATABASE_URL` (or `DATABASE_URL`) is
//! set; otherwise they skip. Each test uses its own user so runs do not
//! interfere.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, sign_up, TestApp};
use uuid::Uuid;

fn unique_email(tag: &str) -> String {
    format!("{}+{}@example.com", tag, Uuid::new_v4().simple())
}

macro_rules! require_database {
    () => {
        match TestApp::with_database().await {
            Some(app) => app,
            None => {
                eprintln!("skipping: no test database configured");
                return;
            }
        }
    };
}

#[tokio::test]
async fn test_job_crud_cycle() {
    let app = require_database!();

    // Create
    let response = app
        .post_json(
            "/api/jobs",
            &serde_json::json!({"title": "Welder", "description": "Join metal"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_i64().expect("generated id");
    assert_eq!(created["title"], serde_json::json!("Welder"));
    assert_eq!(created["description"], serde_json::json!("Join metal"));
    assert!(created["createdAt"].as_str().is_some());

    // Read back
    let response = app.get(&format!("/api/jobs/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"].as_i64(), Some(id));

    // Listed
    let response = app.get("/api/jobs").await;
    let jobs = body_json(response).await;
    assert!(jobs
        .as_array()
        .unwrap()
        .iter()
        .any(|job| job["id"].as_i64() == Some(id)));

    // Partial update: title only, description untouched
    let response = app
        .send_json(
            Method::PUT,
            &format!("/api/jobs/{id}"),
            &serde_json::json!({"title": "Senior Welder"}),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], serde_json::json!("Senior Welder"));
    assert_eq!(updated["description"], serde_json::json!("Join metal"));

    // Delete, then the id is gone
    let response = app.delete(&format!("/api/jobs/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"deleted": true})
    );

    let response = app.delete(&format!("/api/jobs/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get(&format!("/api/jobs/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = require_database!();
    let email = unique_email("session");

    let token = sign_up(&app, &email).await;

    // Token round-trips through get-session
    let response = app.get_authed("/api/auth/get-session", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = body_json(response).await;
    assert_eq!(session["user"]["email"], serde_json::json!(email));
    assert_eq!(session["user"]["emailVerified"], serde_json::json!(false));

    // Duplicate email conflicts
    let response = app
        .post_json(
            "/api/auth/sign-up/email",
            &serde_json::json!({
                "name": "Someone Else",
                "email": email,
                "password": "another-password",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Sign out revokes the token
    let response = app
        .post_json_authed("/api/auth/sign-out", &serde_json::json!({}), &token)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get_authed("/api/auth/get-session", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage tokens never authenticate
    let response = app.get_authed("/api/auth/get-session", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    app.delete_user(&email).await;
}

#[tokio::test]
async fn test_email_verification_otp_flow() {
    let app = require_database!();
    let email = unique_email("verify");
    sign_up(&app, &email).await;

    let response = app
        .post_json(
            "/api/auth/email-otp/send-verification-otp",
            &serde_json::json!({"email": email, "type": "email-verification"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let captured = app.email.get_emails_for_recipient(&email);
    assert_eq!(captured.len(), 1);
    assert_eq!(
        captured[0].message.subject,
        "Verify your Email Address"
    );
    let otp = captured[0].extract_otp().expect("otp in rendered document");

    let response = app
        .post_json(
            "/api/auth/email-otp/verify-email",
            &serde_json::json!({"email": email, "otp": otp}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"success": true})
    );

    // Single use: the same code no longer verifies
    let response = app
        .post_json(
            "/api/auth/email-otp/verify-email",
            &serde_json::json!({"email": email, "otp": otp}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.delete_user(&email).await;
}

#[tokio::test]
async fn test_otp_is_scoped_to_its_purpose() {
    let app = require_database!();
    let email = unique_email("scoped");
    sign_up(&app, &email).await;

    // Issue a sign-in code
    let response = app
        .post_json(
            "/api/auth/email-otp/send-verification-otp",
            &serde_json::json!({"email": email, "type": "sign-in"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let captured = app.email.get_emails_for_recipient(&email);
    assert_eq!(captured[0].message.subject, "Your One-Time Password");
    let otp = captured[0].extract_otp().unwrap();

    // A sign-in code cannot verify the email address
    let response = app
        .post_json(
            "/api/auth/email-otp/verify-email",
            &serde_json::json!({"email": email, "otp": otp}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // It does sign the user in, and doing so marks the email verified
    let response = app
        .post_json(
            "/api/auth/sign-in/email-otp",
            &serde_json::json!({"email": email, "otp": otp}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = body_json(response).await;
    assert_eq!(session["user"]["emailVerified"], serde_json::json!(true));

    app.delete_user(&email).await;
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = require_database!();
    let email = unique_email("reset");
    let old_token = sign_up(&app, &email).await;

    let response = app
        .post_json(
            "/api/auth/forget-password/email-otp",
            &serde_json::json!({"email": email}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let captured = app.email.get_emails_for_recipient(&email);
    assert_eq!(captured[0].message.subject, "Password Reset Request");
    let otp = captured[0].extract_otp().unwrap();

    let response = app
        .post_json(
            "/api/auth/email-otp/reset-password",
            &serde_json::json!({"email": email, "otp": otp, "password": "brand-new-password"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Existing sessions are revoked
    let response = app.get_authed("/api/auth/get-session", &old_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Old password fails, new password works
    let response = app
        .post_json(
            "/api/auth/sign-in/email",
            &serde_json::json!({"email": email, "password": "correct-horse-battery"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_json(
            "/api/auth/sign-in/email",
            &serde_json::json!({"email": email, "password": "brand-new-password"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    app.delete_user(&email).await;
}

#[tokio::test]
async fn test_payment_intent_envelope() {
    let app = require_database!();
    let email = unique_email("intent");
    let token = sign_up(&app, &email).await;

    // Valid amount succeeds with a client secret
    let response = app
        .post_json_authed(
            "/api/payments/create-payment-intent",
            &serde_json::json!({"amount": 500, "currency": "usd"}),
            &token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], serde_json::json!(true));
    assert!(json["clientSecret"].as_str().is_some_and(|s| !s.is_empty()));

    // Zero amount fails inside the envelope, still HTTP 200
    let response = app
        .post_json_authed(
            "/api/payments/create-payment-intent",
            &serde_json::json!({"amount": 0, "currency": "usd"}),
            &token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], serde_json::json!(false));
    assert_eq!(
        json["error"],
        serde_json::json!("Amount must be greater than 0")
    );

    app.delete_user(&email).await;
}

#[tokio::test]
async fn test_back_to_back_subscriptions_reuse_the_gateway_customer() {
    let app = require_database!();
    let email = unique_email("subs");
    let token = sign_up(&app, &email).await;

    let first = app
        .post_json_authed(
            "/api/payments/create-subscription",
            &serde_json::json!({"priceId": "price_123"}),
            &token,
        )
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["success"], serde_json::json!(true));
    assert!(first["subscriptionId"].as_str().is_some());
    assert!(first["clientSecret"].as_str().is_some());

    let second = app
        .post_json_authed(
            "/api/payments/create-subscription",
            &serde_json::json!({"priceId": "price_123"}),
            &token,
        )
        .await;
    let second = body_json(second).await;
    assert_eq!(second["success"], serde_json::json!(true));

    // One gateway customer for both subscriptions
    assert_eq!(app.gateway.customer_create_count(), 1);

    // Both subscriptions were mirrored locally
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM subscriptions s JOIN users u ON u.id = s.user_id WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(count.0, 2);

    app.delete_user(&email).await;
}

#[tokio::test]
async fn test_empty_price_id_fails_in_the_envelope() {
    let app = require_database!();
    let email = unique_email("price");
    let token = sign_up(&app, &email).await;

    let response = app
        .post_json_authed(
            "/api/payments/create-subscription",
            &serde_json::json!({"priceId": ""}),
            &token,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], serde_json::json!(false));
    assert_eq!(json["error"], serde_json::json!("Price ID is required"));

    app.delete_user(&email).await;
}
