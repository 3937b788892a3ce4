//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::tokens::extract_bearer_token;

/// Authenticated user extractor (bearer session required)
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate_session(&token).await?;

        Ok(AuthUser(auth_context))
    }
}

/// Optional variant: `None` instead of a rejection when the request
/// carries no usable session. Handlers that shape their own
/// unauthenticated response use this.
#[derive(Debug)]
pub struct OptionalAuthUser(pub Option<AuthContext>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let context = AuthUser::from_request_parts(parts, state)
            .await
            .ok()
            .map(|AuthUser(context)| context);
        Ok(OptionalAuthUser(context))
    }
}
