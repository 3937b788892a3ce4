//! Gateway used when no Stripe secret key is configured.
//!
//! Input validation still runs so callers get the same validation errors
//! whether or not payments are enabled; only requests that would actually
//! reach Stripe fail with a configuration error.

use crate::{
    validate_customer, validate_customer_id, validate_payment_intent, validate_subscription,
    CreateCustomerParams, CreatePaymentIntentParams, Customer, PaymentError, PaymentGateway,
    PaymentIntent, Subscription,
};

const NOT_CONFIGURED: &str = "Stripe is not configured";

/// Stand-in gateway that rejects every operation.
pub struct DisabledGateway;

#[async_trait::async_trait]
impl PaymentGateway for DisabledGateway {
    async fn create_payment_intent(
        &self,
        params: CreatePaymentIntentParams,
    ) -> Result<PaymentIntent, PaymentError> {
        validate_payment_intent(&params)?;
        Err(PaymentError::Configuration(NOT_CONFIGURED.to_string()))
    }

    async fn create_customer(
        &self,
        params: CreateCustomerParams,
    ) -> Result<Customer, PaymentError> {
        validate_customer(&params)?;
        Err(PaymentError::Configuration(NOT_CONFIGURED.to_string()))
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, PaymentError> {
        validate_customer_id(customer_id)?;
        Err(PaymentError::Configuration(NOT_CONFIGURED.to_string()))
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, PaymentError> {
        validate_subscription(customer_id, price_id)?;
        Err(PaymentError::Configuration(NOT_CONFIGURED.to_string()))
    }
}
