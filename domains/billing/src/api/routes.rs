//! Route definitions for the billing domain API

use axum::{routing::post, Router};

use super::handlers;
use super::middleware::BillingState;

/// Create all billing domain API routes
pub fn routes() -> Router<BillingState> {
    Router::new()
        .route(
            "/api/payments/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route(
            "/api/payments/create-subscription",
            post(handlers::create_subscription),
        )
}
