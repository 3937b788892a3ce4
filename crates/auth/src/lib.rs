//! Authentication for the starter API
//!
//! Credential and one-time-password authentication over Postgres: opaque
//! bearer sessions, scrypt password hashing, and axum extractors that work
//! with any state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod config;
mod context;
mod error;
mod extractors;
mod handlers;
mod password;
mod routes;
mod state;
mod tokens;
mod types;

pub use backend::AuthBackend;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AuthUser, OptionalAuthUser};
pub use routes::routes;
pub use state::AuthState;
pub use types::{AuthIdentity, AuthSession, OtpPurpose};
