//! Email service for delivering invitation links.
//!
//! Supports two providers:
//! - `console`: Logs emails (development)
//! - `sendgrid`: Uses the SendGrid v3 API
//!
//! Delivery failures are reported to the caller, which logs them; an
//! invitation is never rolled back because its email could not be sent.

use crate::config::EmailConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

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

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

/// Which invitation email to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationEmailKind {
    /// First link for a new invitation.
    Initial,
    /// Replacement link after a renewal was approved.
    Renewed,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
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
            "console" => self.send_console(message),
            "sendgrid" => self.send_sendgrid(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send the invitation link to the invitee.
    pub async fn send_invitation_email(
        &self,
        to_email: &str,
        link: &str,
        expires_at: DateTime<Utc>,
        kind: InvitationEmailKind,
    ) -> Result<(), EmailError> {
        let message = invitation_message(
            to_email,
            link,
            expires_at,
            kind,
            &self.config.sender_name,
        );
        self.send(message).await
    }

    /// Console provider - logs email (for development).
    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            body_text = %message.body_text,
            "Email (console provider)"
        );
        Ok(())
    }

    /// SendGrid provider - sends via SendGrid API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let mut content = vec![serde_json::json!({
            "type": "text/plain",
            "value": message.body_text
        })];
        if let Some(html) = &message.body_html {
            content.push(serde_json::json!({
                "type": "text/html",
                "value": html
            }));
        }

        let body = serde_json::json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": content
        });

        let response = self
            .client
            .post(SENDGRID_URL)
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(to = %message.to, subject = %message.subject, "Email sent via SendGrid");
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_body, "SendGrid API error");
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }
}

/// Builds the invitation email.
pub fn invitation_message(
    to_email: &str,
    link: &str,
    expires_at: DateTime<Utc>,
    kind: InvitationEmailKind,
    sender_name: &str,
) -> EmailMessage {
    let (subject, intro) = match kind {
        InvitationEmailKind::Initial => (
            format!("You're invited to {}", sender_name),
            "You have been invited to join your coach on",
        ),
        InvitationEmailKind::Renewed => (
            format!("Your new invitation link for {}", sender_name),
            "Here is a fresh invitation link to join your coach on",
        ),
    };
    let expires = expires_at.format("%Y-%m-%d %H:%M UTC");

    let body_text = format!(
        "Hi,\n\n{intro} {sender_name}.\n\nCreate your account here:\n\n{link}\n\n\
         This link expires at {expires}. If it has expired, open it anyway to request a new one.\n"
    );

    let body_html = format!(
        r#"<p>Hi,</p>
<p>{intro} {sender_name}.</p>
<p><a href="{link}">Create your account</a></p>
<p style="color:#666;font-size:14px">This link expires at {expires}. If it has expired, open it anyway to request a new one.</p>"#
    );

    EmailMessage {
        to: to_email.to_string(),
        subject,
        body_text,
        body_html: Some(body_html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            sendgrid_api_key: String::new(),
            sender_email: "test@example.com".to_string(),
            sender_name: "Coach Tracker".to_string(),
        }
    }

    #[test]
    fn test_invitation_message_contains_link_and_expiry() {
        let expires = Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap();
        let message = invitation_message(
            "a@x.com",
            "http://localhost:5173/invite/abc",
            expires,
            InvitationEmailKind::Initial,
            "Coach Tracker",
        );

        assert_eq!(message.to, "a@x.com");
        assert_eq!(message.subject, "You're invited to Coach Tracker");
        assert!(message.body_text.contains("http://localhost:5173/invite/abc"));
        assert!(message.body_text.contains("2025-03-01 13:00 UTC"));
        assert!(message
            .body_html
            .unwrap()
            .contains(r#"href="http://localhost:5173/invite/abc""#));
    }

    #[test]
    fn test_renewed_message_subject() {
        let message = invitation_message(
            "a@x.com",
            "link",
            Utc::now(),
            InvitationEmailKind::Renewed,
            "Coach Tracker",
        );
        assert!(message.subject.starts_with("Your new invitation link"));
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(test_config());
        assert!(service.is_enabled());

        let result = service
            .send_invitation_email("a@x.com", "link", Utc::now(), InvitationEmailKind::Initial)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_disabled_silently_succeeds() {
        let mut config = test_config();
        config.enabled = false;
        config.provider = "sendgrid".to_string();
        let service = EmailService::new(config);

        let result = service
            .send_invitation_email("a@x.com", "link", Utc::now(), InvitationEmailKind::Initial)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_is_not_configured() {
        let mut config = test_config();
        config.provider = "sendgrid".to_string();
        let service = EmailService::new(config);

        let result = service
            .send_invitation_email("a@x.com", "link", Utc::now(), InvitationEmailKind::Initial)
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_unknown_provider_errors() {
        let mut config = test_config();
        config.provider = "pigeon".to_string();
        let service = EmailService::new(config);

        let result = service
            .send(EmailMessage {
                to: "a@x.com".to_string(),
                subject: "s".to_string(),
                body_text: "b".to_string(),
                body_html: None,
            })
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }
}
