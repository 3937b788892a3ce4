//! Billing domain: payment intent and subscription creation
//!
//! Thin pass-through over the payment gateway: resolve the authenticated
//! user, lazily attach a gateway customer, forward the request, and mirror
//! successful subscriptions into the local `subscriptions` table.

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

pub use api::{routes, BillingState};
pub use domain::entities::SubscriptionRecord;
pub use repository::{BillingRepositories, SubscriptionRepository, UserBillingRepository};
pub use service::BillingService;
