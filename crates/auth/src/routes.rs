//! Route definitions for the auth API

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AuthState;

/// Create all auth routes
pub fn routes() -> Router<AuthState> {
    Router::new()
        .route("/api/auth/sign-up/email", post(handlers::sign_up))
        .route("/api/auth/sign-in/email", post(handlers::sign_in))
        .route("/api/auth/sign-out", post(handlers::sign_out))
        .route("/api/auth/get-session", get(handlers::get_session))
        .route(
            "/api/auth/email-otp/send-verification-otp",
            post(handlers::send_verification_otp),
        )
        .route("/api/auth/sign-in/email-otp", post(handlers::sign_in_with_otp))
        .route(
            "/api/auth/email-otp/verify-email",
            post(handlers::verify_email),
        )
        .route(
            "/api/auth/forget-password/email-otp",
            post(handlers::forget_password),
        )
        .route(
            "/api/auth/email-otp/reset-password",
            post(handlers::reset_password),
        )
}
