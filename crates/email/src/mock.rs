//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without external
//! dependencies. Captured one-time-password emails can be queried by
//! recipient and the code extracted back out of the rendered document.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Extract the one-time password from the rendered document.
    ///
    /// Looks for the first standalone six-digit group in the text body,
    /// falling back to the HTML body.
    pub fn extract_otp(&self) -> Option<String> {
        let text = format!(
            "{} {}",
            self.message.body_text,
            self.message.body_html.as_deref().unwrap_or("")
        );

        let re = regex::Regex::new(r"\b(\d{6})\b").ok()?;
        re.captures(&text)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// The `email_type` metadata tag, if any
    pub fn email_type(&self) -> Option<&str> {
        self.message.metadata.get("email_type").map(|s| s.as_str())
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    enabled: bool,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            enabled: true,
        }
    }

    /// Create a disabled mock email service (for testing)
    pub fn new_disabled() -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            enabled: false,
        }
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        self.emails.lock().unwrap().clone()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.email_by_recipient
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    /// Get the most recent one-time-password email for a recipient
    pub fn get_latest_otp_email(&self, email: &str) -> Option<CapturedEmail> {
        self.get_emails_for_recipient(email)
            .into_iter()
            .filter(|e| {
                matches!(
                    e.email_type(),
                    Some("sign_in_otp") | Some("verify_email") | Some("reset_password")
                )
            })
            .max_by_key(|e| e.captured_at)
    }

    /// Get the one-time password from the most recent OTP email
    pub fn get_otp_for_email(&self, email: &str) -> Option<String> {
        self.get_latest_otp_email(email)
            .and_then(|email| email.extract_otp())
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails.lock().unwrap().len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        self.emails.lock().unwrap().clear();
        self.email_by_recipient.lock().unwrap().clear();
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", Uuid::new_v4()),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                metadata: message.metadata.clone(),
            });
        }

        tracing::info!("Mock email service capturing email to: {}", message.to);

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        // Store email in global list
        self.emails.lock().unwrap().push(captured.clone());

        // Store email by recipient for easy lookup
        self.email_by_recipient
            .lock()
            .unwrap()
            .entry(message.to)
            .or_default()
            .push(captured);

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        "no-reply@starter.app".to_string()
    }

    fn service_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OtpTemplate;

    #[tokio::test]
    async fn test_mock_email_service() {
        let service = MockEmailService::new();

        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@starter.app".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        );

        let receipt = service.send_email(message).await.unwrap();

        assert!(receipt.message_id.starts_with("mock-"));
        assert_eq!(receipt.provider, "mock");
        assert_eq!(service.email_count(), 1);

        let emails = service.get_emails_for_recipient("test@example.com");
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].message.subject, "Test Subject");
    }

    #[tokio::test]
    async fn test_otp_email_capture_and_extraction() {
        let service = MockEmailService::new();

        service
            .send_one_time_password(OtpTemplate::SignIn, "user@example.com", "493021")
            .await
            .unwrap();

        let captured = service.get_latest_otp_email("user@example.com").unwrap();
        assert_eq!(captured.email_type(), Some("sign_in_otp"));
        assert_eq!(captured.extract_otp(), Some("493021".to_string()));
        assert_eq!(
            service.get_otp_for_email("user@example.com"),
            Some("493021".to_string())
        );
    }

    #[tokio::test]
    async fn test_latest_otp_wins() {
        let service = MockEmailService::new();

        service
            .send_one_time_password(OtpTemplate::VerifyEmail, "user@example.com", "111111")
            .await
            .unwrap();
        // Later codes replace earlier ones in lookups
        tokio::time::sleep(tokio::time::Duration::from_millis(2)).await;
        service
            .send_one_time_password(OtpTemplate::VerifyEmail, "user@example.com", "222222")
            .await
            .unwrap();

        assert_eq!(service.email_count(), 2);
        assert_eq!(
            service.get_otp_for_email("user@example.com"),
            Some("222222".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_otp_emails_are_ignored_by_otp_lookup() {
        let service = MockEmailService::new();

        let message = EmailMessage::new(
            "user@example.com".to_string(),
            "sender@starter.app".to_string(),
            "Newsletter".to_string(),
            "Code-free body with 999999 inside".to_string(),
        );
        service.send_email(message).await.unwrap();

        assert!(service.get_latest_otp_email("user@example.com").is_none());
        assert!(service.get_otp_for_email("user@example.com").is_none());
    }

    #[tokio::test]
    async fn test_disabled_mock_service() {
        let service = MockEmailService::new_disabled();

        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@starter.app".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        );

        let receipt = service.send_email(message).await.unwrap();

        assert!(receipt.message_id.starts_with("disabled-"));
        assert_eq!(receipt.provider, "mock-disabled");
        assert_eq!(service.email_count(), 0); // Email not captured when disabled
    }

    #[tokio::test]
    async fn test_clear_resets_capture_state() {
        let service = MockEmailService::new();

        service
            .send_one_time_password(OtpTemplate::ResetPassword, "user@example.com", "654321")
            .await
            .unwrap();
        assert_eq!(service.email_count(), 1);

        service.clear();
        assert_eq!(service.email_count(), 0);
        assert!(service.get_emails_for_recipient("user@example.com").is_empty());
    }
}
