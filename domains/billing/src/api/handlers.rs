//! Billing API handlers
//!
//! Both routes answer HTTP 200 with a `{success, ...}` envelope on every
//! outcome once the caller is authenticated; only a missing or invalid
//! bearer session rejects with 401 before any work happens.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use starter_auth::AuthUser;
use starter_common::ValidatedJson;
use validator::Validate;

use crate::api::middleware::BillingState;

const PAYMENT_INTENT_FALLBACK: &str = "Payment intent creation failed";
const SUBSCRIPTION_FALLBACK: &str = "Subscription creation failed";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in the smallest currency unit; range-checked by the gateway
    pub amount: i64,
    pub currency: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    /// Gateway price id; presence-checked by the gateway
    pub price_id: String,
}

/// `{success, clientSecret}` or `{success: false, error}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `{success, subscriptionId, clientSecret}` or `{success: false, error}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error message for the envelope; an empty message gets the route's
/// fixed fallback.
fn envelope_message(error: starter_common::Error, fallback: &str) -> String {
    let message = error.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// POST /api/payments/create-payment-intent
pub async fn create_payment_intent(
    State(state): State<BillingState>,
    AuthUser(context): AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePaymentIntentRequest>,
) -> Json<PaymentIntentResponse> {
    let outcome = state
        .service
        .create_payment_intent(
            &context.user,
            request.amount,
            request.currency,
            request.metadata,
        )
        .await;

    let response = match outcome {
        Ok(intent) => PaymentIntentResponse {
            success: true,
            client_secret: intent.client_secret,
            error: None,
        },
        Err(error) => {
            tracing::warn!(user_id = %context.user.id, error = %error, "Payment intent creation failed");
            PaymentIntentResponse {
                success: false,
                client_secret: None,
                error: Some(envelope_message(error, PAYMENT_INTENT_FALLBACK)),
            }
        }
    };

    Json(response)
}

/// POST /api/payments/create-subscription
pub async fn create_subscription(
    State(state): State<BillingState>,
    AuthUser(context): AuthUser,
    ValidatedJson(request): ValidatedJson<CreateSubscriptionRequest>,
) -> Json<SubscriptionResponse> {
    let outcome = state
        .service
        .create_subscription(&context.user, &request.price_id)
        .await;

    let response = match outcome {
        Ok(subscription) => SubscriptionResponse {
            success: true,
            subscription_id: Some(subscription.subscription_id),
            client_secret: subscription.client_secret,
            error: None,
        },
        Err(error) => {
            tracing::warn!(user_id = %context.user.id, error = %error, "Subscription creation failed");
            SubscriptionResponse {
                success: false,
                subscription_id: None,
                client_secret: None,
                error: Some(envelope_message(error, SUBSCRIPTION_FALLBACK)),
            }
        }
    };

    Json(response)
}
