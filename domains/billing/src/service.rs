//! Billing service
//!
//! Owns the per-request flow behind the two payment routes: make sure the
//! user has a gateway customer, forward the operation, and mirror
//! successful subscriptions locally.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use starter_auth::AuthIdentity;
use starter_common::{Error, Result};
use starter_payments::{
    CreateCustomerParams, CreatePaymentIntentParams, PaymentError, PaymentGateway, Subscription,
};

use crate::repository::BillingRepositories;

/// Result of a payment-intent creation, as the route reports it
#[derive(Debug, Clone)]
pub struct PaymentIntentOutcome {
    pub client_secret: Option<String>,
}

/// Result of a subscription creation, as the route reports it
#[derive(Debug, Clone)]
pub struct SubscriptionOutcome {
    pub subscription_id: String,
    pub client_secret: Option<String>,
}

fn gateway_error(error: PaymentError) -> Error {
    match error {
        PaymentError::Configuration(msg) => Error::Configuration(msg),
        PaymentError::Validation(msg) => Error::Validation(msg),
        other => Error::Payment(other.to_string()),
    }
}

/// Local period bounds from a gateway subscription. A response without
/// usable period timestamps falls back to a now / now+30d window.
fn period_bounds(subscription: &Subscription) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = subscription
        .period_start()
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .unwrap_or_else(Utc::now);
    let end = subscription
        .period_end()
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .unwrap_or_else(|| Utc::now() + Duration::days(30));
    (start, end)
}

#[derive(Clone)]
pub struct BillingService {
    repos: BillingRepositories,
    gateway: Arc<dyn PaymentGateway>,
}

impl BillingService {
    pub fn new(repos: BillingRepositories, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { repos, gateway }
    }

    /// Gateway customer id for the user, creating and persisting one on
    /// first use.
    ///
    /// Read-check-create with no locking: two concurrent first-time
    /// payments from the same user can each create a gateway customer,
    /// the last write winning. Known upstream behavior, kept as is.
    pub async fn ensure_stripe_customer(&self, user: &AuthIdentity) -> Result<String> {
        if let Some(customer_id) = &user.stripe_customer_id {
            return Ok(customer_id.clone());
        }

        let customer = self
            .gateway
            .create_customer(CreateCustomerParams {
                email: user.email.clone(),
                name: Some(user.name.clone()),
                metadata: None,
            })
            .await
            .map_err(gateway_error)?;

        self.repos
            .users
            .set_stripe_customer_id(user.id, &customer.id)
            .await?;

        tracing::info!(user_id = %user.id, "Gateway customer attached to user");
        Ok(customer.id)
    }

    /// Create a payment intent for the user
    pub async fn create_payment_intent(
        &self,
        user: &AuthIdentity,
        amount: i64,
        currency: Option<String>,
        metadata: Option<std::collections::HashMap<String, String>>,
    ) -> Result<PaymentIntentOutcome> {
        let customer_id = self.ensure_stripe_customer(user).await?;

        let intent = self
            .gateway
            .create_payment_intent(CreatePaymentIntentParams {
                amount,
                currency: currency.unwrap_or_else(|| "usd".to_string()),
                customer_id: Some(customer_id),
                metadata,
            })
            .await
            .map_err(gateway_error)?;

        Ok(PaymentIntentOutcome {
            client_secret: intent.client_secret,
        })
    }

    /// Create a subscription for the user and mirror it locally
    pub async fn create_subscription(
        &self,
        user: &AuthIdentity,
        price_id: &str,
    ) -> Result<SubscriptionOutcome> {
        if user.email.is_empty() {
            return Err(Error::Validation("User email is required".to_string()));
        }

        let customer_id = self.ensure_stripe_customer(user).await?;

        let subscription = self
            .gateway
            .create_subscription(&customer_id, price_id)
            .await
            .map_err(gateway_error)?;

        let (period_start, period_end) = period_bounds(&subscription);
        self.repos
            .subscriptions
            .create(
                user.id,
                &subscription.id,
                price_id,
                &subscription.status,
                period_start,
                period_end,
            )
            .await?;

        tracing::info!(
            user_id = %user.id,
            subscription_id = %subscription.id,
            status = %subscription.status,
            "Subscription created"
        );

        Ok(SubscriptionOutcome {
            client_secret: subscription.client_secret().map(str::to_string),
            subscription_id: subscription.id,
        })
    }
}
