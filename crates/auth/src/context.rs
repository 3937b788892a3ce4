//! Authenticated request context

use crate::types::{AuthIdentity, AuthSession};

/// An authenticated user together with the session that proved it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
    pub session: AuthSession,
}

impl AuthContext {
    pub fn new(user: AuthIdentity, session: AuthSession) -> Self {
        Self { user, session }
    }
}
