//! Mock payment gateway for tests.
//!
//! Records every call and produces deterministic fake identifiers so tests
//! can assert on exactly what the application asked the gateway to do. A
//! scripted failure can be injected to exercise error paths.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    validate_customer, validate_customer_id, validate_payment_intent, validate_subscription,
    CreateCustomerParams, CreatePaymentIntentParams, Customer, Invoice, PaymentError,
    PaymentGateway, PaymentIntent, Subscription, SubscriptionItems,
};

/// One recorded gateway invocation.
#[derive(Debug, Clone)]
pub enum RecordedPaymentCall {
    CreatePaymentIntent(CreatePaymentIntentParams),
    CreateCustomer(CreateCustomerParams),
    RetrieveCustomer(String),
    CreateSubscription {
        customer_id: String,
        price_id: String,
    },
}

/// In-memory gateway that records calls instead of talking to Stripe.
#[derive(Clone)]
pub struct MockPaymentGateway {
    calls: Arc<Mutex<Vec<RecordedPaymentCall>>>,
    fail_with: Arc<Mutex<Option<PaymentError>>>,
    counter: Arc<AtomicU64>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Arc::new(Mutex::new(None)),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Every subsequent call fails with the given error until cleared.
    pub fn set_failure(&self, error: PaymentError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    pub fn recorded_calls(&self) -> Vec<RecordedPaymentCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// How many customers this gateway has been asked to create.
    pub fn customer_create_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, RecordedPaymentCall::CreateCustomer(_)))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: RecordedPaymentCall) -> Result<(), PaymentError> {
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}_mock_{}", prefix, n)
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment_intent(
        &self,
        params: CreatePaymentIntentParams,
    ) -> Result<PaymentIntent, PaymentError> {
        validate_payment_intent(&params)?;
        self.record(RecordedPaymentCall::CreatePaymentIntent(params))?;

        let id = self.next_id("pi");
        Ok(PaymentIntent {
            client_secret: Some(format!("{}_secret", id)),
            id,
            status: "requires_payment_method".to_string(),
        })
    }

    async fn create_customer(
        &self,
        params: CreateCustomerParams,
    ) -> Result<Customer, PaymentError> {
        validate_customer(&params)?;
        let email = params.email.clone();
        let name = params.name.clone();
        self.record(RecordedPaymentCall::CreateCustomer(params))?;

        Ok(Customer {
            id: self.next_id("cus"),
            email: Some(email),
            name,
            deleted: false,
        })
    }

    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, PaymentError> {
        validate_customer_id(customer_id)?;
        self.record(RecordedPaymentCall::RetrieveCustomer(
            customer_id.to_string(),
        ))?;

        Ok(Customer {
            id: customer_id.to_string(),
            email: None,
            name: None,
            deleted: false,
        })
    }

    async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, PaymentError> {
        validate_subscription(customer_id, price_id)?;
        self.record(RecordedPaymentCall::CreateSubscription {
            customer_id: customer_id.to_string(),
            price_id: price_id.to_string(),
        })?;

        let id = self.next_id("sub");
        let intent_id = self.next_id("pi");
        let now = chrono::Utc::now().timestamp();
        Ok(Subscription {
            id,
            status: "incomplete".to_string(),
            current_period_start: Some(now),
            current_period_end: Some(now + 30 * 24 * 60 * 60),
            billing_cycle_anchor: Some(now),
            items: SubscriptionItems::default(),
            latest_invoice: Some(Invoice {
                payment_intent: Some(PaymentIntent {
                    client_secret: Some(format!("{}_secret", intent_id)),
                    id: intent_id,
                    status: "requires_payment_method".to_string(),
                }),
            }),
        })
    }
}
