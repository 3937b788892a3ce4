//! Route definitions for the Jobs domain API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers;
use super::middleware::JobsState;

/// Create all Jobs domain API routes
pub fn routes() -> Router<JobsState> {
    Router::new()
        .route("/api/jobs", get(handlers::list_jobs))
        .route("/api/jobs", post(handlers::create_job))
        .route("/api/jobs/{id}", get(handlers::get_job))
        .route("/api/jobs/{id}", put(handlers::update_job))
        .route("/api/jobs/{id}", delete(handlers::delete_job))
}
