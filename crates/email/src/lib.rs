//! Starter Email Service
//!
//! Provides email rendering and delivery plumbing for authentication flows:
//! - Three one-time-password templates (sign-in, verify email, reset password)
//! - A delivery trait so transports can be swapped without touching callers
//! - Mock email service for testing and development
//!
//! No live transport ships with this crate; the mock is the only concrete
//! implementation. Rendering is pure and independently testable.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod content;
pub mod mock;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("Email delivery error: {0}")]
    Delivery(String),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            reply_to: None,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add reply-to address
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Which one-time-password document to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpTemplate {
    SignIn,
    VerifyEmail,
    ResetPassword,
}

impl OtpTemplate {
    /// Subject line for the rendered document
    pub fn subject(&self) -> &'static str {
        match self {
            OtpTemplate::SignIn => "Your One-Time Password",
            OtpTemplate::VerifyEmail => "Verify your Email Address",
            OtpTemplate::ResetPassword => "Password Reset Request",
        }
    }

    /// Metadata tag recorded on outgoing messages
    pub fn metadata_value(&self) -> &'static str {
        match self {
            OtpTemplate::SignIn => "sign_in_otp",
            OtpTemplate::VerifyEmail => "verify_email",
            OtpTemplate::ResetPassword => "reset_password",
        }
    }
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider ("mock" is the only shipped provider)
    pub provider: String,
    /// Default from address
    pub default_from: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let default_from =
            std::env::var("FROM_EMAIL").unwrap_or_else(|_| "no-reply@starter.app".to_string());

        let enabled = std::env::var("EMAIL_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            provider,
            default_from,
            enabled,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync + std::fmt::Debug {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Provider name for logging
    fn service_name(&self) -> &'static str;

    /// Render a one-time-password document and hand it to the transport
    async fn send_one_time_password(
        &self,
        template: OtpTemplate,
        recipient_email: &str,
        otp: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let (body_text, body_html) = match template {
            OtpTemplate::SignIn => (
                content::sign_in_otp_text(recipient_email, otp),
                content::sign_in_otp_html(recipient_email, otp),
            ),
            OtpTemplate::VerifyEmail => (
                content::verify_email_text(recipient_email, otp),
                content::verify_email_html(recipient_email, otp),
            ),
            OtpTemplate::ResetPassword => (
                content::reset_password_text(recipient_email, otp),
                content::reset_password_html(recipient_email, otp),
            ),
        };

        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            template.subject().to_string(),
            body_text,
        )
        .with_html(body_html)
        .with_metadata("email_type".to_string(), template.metadata_value().to_string());

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using mock implementation");
            return Ok(Box::new(mock::MockEmailService::new()));
        }

        match config.provider.as_str() {
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(mock::MockEmailService::new()))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: mock",
                provider
            ))),
        }
    }
}
