//! HTTP handlers for the auth routes
//!
//! Sign-up signs the user in (the response carries a fresh session token).
//! OTP issuance answers success whether or not the email belongs to a user
//! so the routes cannot be used to probe which addresses are registered.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use starter_common::ValidatedJson;
use starter_email::OtpTemplate;
use validator::Validate;

use crate::error::AuthError;
use crate::extractors::AuthUser;
use crate::state::AuthState;
use crate::types::{AuthIdentity, AuthSession, OtpPurpose};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(rename = "type")]
    pub otp_type: OtpPurpose,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpSignInRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ForgetPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub otp: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// `{token, user}` — returned by every route that opens a session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: AuthIdentity,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct GetSessionResponse {
    pub session: AuthSession,
    pub user: AuthIdentity,
}

/// Which email document carries a code for this purpose. Anything that is
/// not a sign-in or email-verification code falls through to the
/// reset-password document.
fn template_for(purpose: OtpPurpose) -> OtpTemplate {
    match purpose {
        OtpPurpose::SignIn => OtpTemplate::SignIn,
        OtpPurpose::EmailVerification => OtpTemplate::VerifyEmail,
        _ => OtpTemplate::ResetPassword,
    }
}

/// Issue and deliver a one-time password if the address belongs to a user;
/// silently succeed otherwise.
async fn dispatch_otp(
    state: &AuthState,
    purpose: OtpPurpose,
    email: &str,
) -> Result<(), AuthError> {
    let Some(user) = state.backend.find_user_by_email(email).await? else {
        return Ok(());
    };

    let otp = state.backend.issue_otp(purpose, &user.email).await?;

    state
        .email
        .send_one_time_password(template_for(purpose), &user.email, &otp)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, purpose = %purpose, "Failed to deliver one-time password");
            AuthError::EmailDelivery
        })?;

    Ok(())
}

/// POST /api/auth/sign-up/email
pub async fn sign_up(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    let context = state
        .backend
        .sign_up(&request.name, &request.email, &request.password)
        .await?;

    Ok(Json(SessionResponse {
        token: context.session.token,
        user: context.user,
    }))
}

/// POST /api/auth/sign-in/email
pub async fn sign_in(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    let context = state
        .backend
        .sign_in_with_password(&request.email, &request.password)
        .await?;

    Ok(Json(SessionResponse {
        token: context.session.token,
        user: context.user,
    }))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<AuthState>,
    AuthUser(context): AuthUser,
) -> Result<Json<SuccessResponse>, AuthError> {
    state.backend.sign_out(&context.session.token).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/auth/get-session
pub async fn get_session(AuthUser(context): AuthUser) -> Json<GetSessionResponse> {
    Json(GetSessionResponse {
        session: context.session,
        user: context.user,
    })
}

/// POST /api/auth/email-otp/send-verification-otp
pub async fn send_verification_otp(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<SendOtpRequest>,
) -> Result<Json<SuccessResponse>, AuthError> {
    dispatch_otp(&state, request.otp_type, &request.email).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/auth/sign-in/email-otp
pub async fn sign_in_with_otp(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<OtpSignInRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    let context = state
        .backend
        .sign_in_with_otp(&request.email, &request.otp)
        .await?;

    Ok(Json(SessionResponse {
        token: context.session.token,
        user: context.user,
    }))
}

/// POST /api/auth/email-otp/verify-email
pub async fn verify_email(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<SuccessResponse>, AuthError> {
    state
        .backend
        .verify_email(&request.email, &request.otp)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/auth/forget-password/email-otp
pub async fn forget_password(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<ForgetPasswordRequest>,
) -> Result<Json<SuccessResponse>, AuthError> {
    dispatch_otp(&state, OtpPurpose::ForgetPassword, &request.email).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/auth/email-otp/reset-password
pub async fn reset_password(
    State(state): State<AuthState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<SuccessResponse>, AuthError> {
    state
        .backend
        .reset_password(&request.email, &request.otp, &request.password)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}
