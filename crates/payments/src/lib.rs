//! Starter Payment Gateway
//!
//! Adapter around the Stripe HTTP API with support for:
//! - Live Stripe client for production (form-encoded v1 endpoints)
//! - Disabled variant when no secret key is configured
//! - Mock gateway for testing and development
//!
//! Every operation validates its arguments before touching the wire, so the
//! disabled and mock variants report the same validation failures as the
//! live client.

pub mod disabled;
pub mod mock;
pub mod stripe;

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PaymentError {
    /// Gateway not configured (absent secret key)
    #[error("{0}")]
    Configuration(String),

    /// Caller-supplied argument missing or out of range
    #[error("{0}")]
    Validation(String),

    /// Error reported by the gateway itself
    #[error("{0}")]
    Api(String),

    /// Transport-level failure before a gateway response was read
    #[error("Payment request error: {0}")]
    Request(String),
}

/// Parameters for creating a payment intent
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentParams {
    /// Amount in the smallest currency unit
    pub amount: i64,
    pub currency: String,
    pub customer_id: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

/// Parameters for creating a customer
#[derive(Debug, Clone)]
pub struct CreateCustomerParams {
    pub email: String,
    pub name: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

/// Minimal decode of a gateway payment intent
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
}

/// Minimal decode of a gateway customer
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Minimal decode of a gateway subscription
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub billing_cycle_anchor: Option<i64>,
    #[serde(default)]
    pub items: SubscriptionItems,
    pub latest_invoice: Option<Invoice>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SubscriptionItems {
    pub data: Vec<SubscriptionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
}

/// Invoice expanded via `expand[]=latest_invoice.payment_intent`
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub payment_intent: Option<PaymentIntent>,
}

impl Subscription {
    /// Period start timestamp, falling back to the first item or the
    /// billing cycle anchor when the top-level field is absent.
    pub fn period_start(&self) -> Option<i64> {
        self.current_period_start
            .or_else(|| {
                self.items
                    .data
                    .first()
                    .and_then(|item| item.current_period_start)
            })
            .or(self.billing_cycle_anchor)
    }

    /// Period end timestamp, falling back to the first item when needed.
    pub fn period_end(&self) -> Option<i64> {
        self.current_period_end.or_else(|| {
            self.items
                .data
                .first()
                .and_then(|item| item.current_period_end)
        })
    }

    /// Client secret of the payment intent on the latest invoice, if expanded
    pub fn client_secret(&self) -> Option<&str> {
        self.latest_invoice
            .as_ref()
            .and_then(|invoice| invoice.payment_intent.as_ref())
            .and_then(|intent| intent.client_secret.as_deref())
    }
}

/// Payment gateway configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret key; `None` disables the gateway
    pub secret_key: Option<String>,
    /// Base URL for the gateway API
    pub base_url: String,
}

impl StripeConfig {
    /// Create gateway config from environment variables
    pub fn from_env() -> Self {
        // Empty string counts as unset, matching the upstream truthiness check
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let base_url = std::env::var("STRIPE_BASE_URL")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());

        Self {
            secret_key,
            base_url,
        }
    }

    /// Config with a secret key against the production endpoint
    pub fn with_secret_key(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: Some(secret_key.into()),
            base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Config with no secret key (gateway disabled)
    pub fn disabled() -> Self {
        Self {
            secret_key: None,
            base_url: "https://api.stripe.com".to_string(),
        }
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field(
                "secret_key",
                &self.secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Payment gateway trait for different implementations
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount/currency
    async fn create_payment_intent(
        &self,
        params: CreatePaymentIntentParams,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Create a customer from an email address and optional name
    async fn create_customer(&self, params: CreateCustomerParams)
        -> Result<Customer, PaymentError>;

    /// Retrieve an existing customer by id
    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, PaymentError>;

    /// Create a subscription for a customer on a price
    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, PaymentError>;
}

/// Factory for creating PaymentGateway implementations.
///
/// The presence check happens exactly once, at startup; afterwards the
/// selected variant answers every call uniformly.
pub struct PaymentGatewayFactory;

impl PaymentGatewayFactory {
    /// Create a PaymentGateway based on configuration.
    pub fn create(config: StripeConfig) -> Box<dyn PaymentGateway> {
        match config.secret_key {
            Some(secret_key) => {
                tracing::info!("Creating Stripe payment gateway");
                Box::new(stripe::StripeGateway::new(secret_key, config.base_url))
            }
            None => {
                tracing::warn!("STRIPE_SECRET_KEY not set, payment features disabled");
                Box::new(disabled::DisabledGateway)
            }
        }
    }
}

pub(crate) fn validate_payment_intent(
    params: &CreatePaymentIntentParams,
) -> Result<(), PaymentError> {
    if params.amount <= 0 {
        return Err(PaymentError::Validation(
            "Amount must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_customer(params: &CreateCustomerParams) -> Result<(), PaymentError> {
    if params.email.is_empty() {
        return Err(PaymentError::Validation("Email is required".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_customer_id(customer_id: &str) -> Result<(), PaymentError> {
    if customer_id.is_empty() {
        return Err(PaymentError::Validation(
            "Customer ID is required".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_subscription(
    customer_id: &str,
    price_id: &str,
) -> Result<(), PaymentError> {
    validate_customer_id(customer_id)?;
    if price_id.is_empty() {
        return Err(PaymentError::Validation("Price ID is required".to_string()));
    }
    Ok(())
}
