//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidCredentials,
    SessionExpired,
    UserNotFound,
    UserExists,
    InvalidOtp,
    OtpExpired,
    EmailDelivery,
    Database,
    Internal,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password",
            ),
            AuthError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SESSION",
                "Invalid or expired session",
            ),
            AuthError::UserNotFound => {
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found")
            }
            AuthError::UserExists => (
                StatusCode::CONFLICT,
                "USER_EXISTS",
                "User already exists",
            ),
            AuthError::InvalidOtp => (
                StatusCode::BAD_REQUEST,
                "INVALID_OTP",
                "Invalid verification code",
            ),
            AuthError::OtpExpired => (
                StatusCode::BAD_REQUEST,
                "OTP_EXPIRED",
                "Verification code has expired",
            ),
            AuthError::EmailDelivery => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EMAIL_DELIVERY_ERROR",
                "Failed to send verification email",
            ),
            AuthError::Database => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "Database operation failed",
            ),
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                "Authentication failed",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
