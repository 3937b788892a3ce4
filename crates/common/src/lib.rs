//! Shared utilities, configuration, and error handling for Starter
//!
//! This crate provides common functionality used across the Starter application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Database pool construction
//! - Custom axum extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use db::create_pool;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
