//! Billing domain state and auth backend integration

use axum::extract::FromRef;
use starter_auth::AuthBackend;

use crate::service::BillingService;

/// Application state for the billing domain
#[derive(Clone)]
pub struct BillingState {
    pub service: BillingService,
    pub auth: AuthBackend,
}

impl FromRef<BillingState> for AuthBackend {
    fn from_ref(state: &BillingState) -> Self {
        state.auth.clone()
    }
}
