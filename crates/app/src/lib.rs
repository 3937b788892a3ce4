//! Starter application composition root
//!
//! Composes the domain routers into a single application. Service
//! selection (live vs. disabled gateway, email provider) happens exactly
//! once here, at startup; every later request goes through whatever
//! variant was chosen.

use std::sync::Arc;

use axum::{Json, Router};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use starter_auth::{AuthBackend, AuthConfig, AuthState};
use starter_billing::{BillingRepositories, BillingService, BillingState};
use starter_common::Config;
use starter_email::{EmailConfig, EmailService, EmailServiceFactory};
use starter_jobs::JobsRepositories;
use starter_payments::{PaymentGateway, PaymentGatewayFactory, StripeConfig};

/// External collaborators the router is wired with. Tests inject mocks
/// here; `create_app` fills it from configuration.
pub struct AppServices {
    pub gateway: Arc<dyn PaymentGateway>,
    pub email: Arc<dyn EmailService>,
}

/// Build the application router from a pool and concrete services.
pub fn build_router(pool: PgPool, services: AppServices) -> Router {
    let auth_backend = AuthBackend::new(pool.clone(), AuthConfig::default());

    let auth_state = AuthState {
        backend: auth_backend.clone(),
        email: Arc::clone(&services.email),
    };

    let jobs_state = starter_jobs::JobsState {
        repos: JobsRepositories::new(pool.clone()),
    };

    let billing_state = BillingState {
        service: BillingService::new(BillingRepositories::new(pool), services.gateway),
        auth: auth_backend,
    };

    Router::new()
        .route("/", axum::routing::get(|| async { "Hello starter" }))
        .route("/health", axum::routing::get(health_check))
        .merge(starter_jobs::routes().with_state(jobs_state))
        .merge(starter_billing::routes().with_state(billing_state))
        .merge(starter_auth::routes().with_state(auth_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let stripe_config = match &config.stripe_secret_key {
        Some(key) => StripeConfig::with_secret_key(key.clone()),
        None => StripeConfig::disabled(),
    };
    let gateway: Arc<dyn PaymentGateway> = Arc::from(PaymentGatewayFactory::create(stripe_config));

    let email_config = EmailConfig::from_env()?;
    let email: Arc<dyn EmailService> = Arc::from(EmailServiceFactory::create(email_config)?);

    Ok(build_router(pool, AppServices { gateway, email }))
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
