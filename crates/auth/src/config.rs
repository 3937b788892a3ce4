//! Authentication configuration

use chrono::Duration;

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lifetime of a session token
    pub session_ttl: Duration,
    /// Lifetime of a one-time password
    pub otp_ttl: Duration,
    /// Number of digits in a one-time password
    pub otp_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::days(7),
            otp_ttl: Duration::minutes(10),
            otp_length: 6,
        }
    }
}
