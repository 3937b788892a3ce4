//! Auth route state

use std::sync::Arc;

use axum::extract::FromRef;
use starter_email::EmailService;

use crate::backend::AuthBackend;

/// Application state for the auth routes
#[derive(Clone)]
pub struct AuthState {
    pub backend: AuthBackend,
    pub email: Arc<dyn EmailService>,
}

impl FromRef<AuthState> for AuthBackend {
    fn from_ref(state: &AuthState) -> Self {
        state.backend.clone()
    }
}
