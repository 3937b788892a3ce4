//! Live Stripe gateway implementation
//!
//! Minimal client over the form-encoded v1 HTTP API. Only the fields this
//! application reads are decoded; everything else in the gateway response
//! is ignored.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::error;

use crate::{
    validate_customer, validate_customer_id, validate_payment_intent, validate_subscription,
    CreateCustomerParams, CreatePaymentIntentParams, Customer, PaymentError, PaymentGateway,
    PaymentIntent, Subscription,
};

/// Stripe client built on reqwest.
pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
}

impl StripeGateway {
    /// Create a new gateway client from a secret key and API base URL.
    pub fn new(secret_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, PaymentError> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .or_else(|| resp.headers().get("stripe-request-id"))
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let details = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error);

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?details.as_ref().and_then(|d| d.type_.as_deref()),
            stripe_error_code = ?details.as_ref().and_then(|d| d.code.as_deref()),
            stripe_error_param = ?details.as_ref().and_then(|d| d.param.as_deref()),
            stripe_decline_code = ?details.as_ref().and_then(|d| d.decline_code.as_deref()),
            response_body = %body,
            context = %context,
            "stripe api request failed"
        );

        // Surface the gateway's own message when it sent one
        let message = details.and_then(|d| d.message).unwrap_or_else(|| {
            format!(
                "Stripe API request failed: {} (status {})",
                context, status
            )
        });

        Err(PaymentError::Api(message))
    }

    async fn post_form(
        &self,
        path: &str,
        body: &[(String, String)],
        context: &str,
    ) -> Result<reqwest::Response, PaymentError> {
        let resp = self
            .http
            .post(self.url(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(body)
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;
        Self::ensure_success(resp, context).await
    }
}

#[async_trait::async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        params: CreatePaymentIntentParams,
    ) -> Result<PaymentIntent, PaymentError> {
        validate_payment_intent(&params)?;

        // https://stripe.com/docs/api/payment_intents/create
        let mut body: Vec<(String, String)> = vec![
            ("amount".to_string(), params.amount.to_string()),
            ("currency".to_string(), params.currency.clone()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        if let Some(customer) = params.customer_id {
            body.push(("customer".to_string(), customer));
        }

        if let Some(metadata) = params.metadata {
            for (key, value) in metadata {
                body.push((format!("metadata[{}]", key), value));
            }
        }

        let resp = self
            .post_form("/v1/payment_intents", &body, "create payment intent")
            .await?;

        let intent: PaymentIntent = resp
            .json()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;
        Ok(intent)
    }

    async fn create_customer(
        &self,
        params: CreateCustomerParams,
    ) -> Result<Customer, PaymentError> {
        validate_customer(&params)?;

        // https://stripe.com/docs/api/customers/create
        let mut body: Vec<(String, String)> = vec![("email".to_string(), params.email.clone())];

        if let Some(name) = params.name {
            body.push(("name".to_string(), name));
        }

        if let Some(metadata) = params.metadata {
            for (key, value) in metadata {
                body.push((format!("metadata[{}]", key), value));
            }
        }

        let resp = self
            .post_form("/v1/customers", &body, "create customer")
            .await?;

        let customer: Customer = resp
            .json()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;
        Ok(customer)
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, PaymentError> {
        validate_customer_id(customer_id)?;

        // https://stripe.com/docs/api/customers/retrieve
        let resp = self
            .http
            .get(self.url(&format!("/v1/customers/{}", customer_id)))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;
        let resp = Self::ensure_success(resp, "retrieve customer").await?;

        let customer: Customer = resp
            .json()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        if customer.deleted {
            return Err(PaymentError::Api("Customer has been deleted".to_string()));
        }

        Ok(customer)
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, PaymentError> {
        validate_subscription(customer_id, price_id)?;

        // https://stripe.com/docs/api/subscriptions/create
        let body: Vec<(String, String)> = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("items[0][price]".to_string(), price_id.to_string()),
            (
                "payment_behavior".to_string(),
                "default_incomplete".to_string(),
            ),
            (
                "payment_settings[save_default_payment_method]".to_string(),
                "on_subscription".to_string(),
            ),
            (
                "expand[]".to_string(),
                "latest_invoice.payment_intent".to_string(),
            ),
        ];

        let resp = self
            .post_form("/v1/subscriptions", &body, "create subscription")
            .await?;

        let subscription: Subscription = resp
            .json()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;
        Ok(subscription)
    }
}
