//! Email alerts over SMTP with implicit TLS (port 465)

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::info;

use crate::domain::notification::{AlertMessage, Notifier};
use crate::shared::config::EmailSettings;
use crate::shared::errors::NotifyError;
use crate::shared::types::AlertChannel;

pub const SMTP_RELAY: &str = "smtp.gmail.com";
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct EmailNotifier {
    settings: EmailSettings,
    relay: String,
}

impl EmailNotifier {
    pub fn new(settings: EmailSettings) -> Self {
        Self {
            settings,
            relay: SMTP_RELAY.to_string(),
        }
    }

    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        self.relay = relay.into();
        self
    }

    fn build_message(&self, subject: String, body: String) -> Result<Message, NotifyError> {
        let missing = self.settings.missing_fields();
        if !missing.is_empty() {
            return Err(NotifyError::MissingCredentials(missing));
        }

        Message::builder()
            .from(self.settings.sender_email.trim().parse()?)
            .to(self.settings.receiver_email.trim().parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotifyError::Build(e.to_string()))
    }

    /// Sends an arbitrary plain-text message with the configured credentials.
    pub async fn send(&self, subject: String, body: String) -> Result<(), NotifyError> {
        let email = self.build_message(subject, body)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.relay)?
            .credentials(Credentials::new(
                self.settings.sender_email.trim().to_string(),
                self.settings.sender_password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        mailer.send(email).await?;
        info!(to = %self.settings.receiver_email, "Email alert sent successfully");
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Email
    }

    async fn dispatch(&self, alert: &AlertMessage) -> Result<(), NotifyError> {
        self.send(alert.subject(), alert.body()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::Condition;
    use crate::domain::price::PriceSnapshot;
    use chrono::Utc;

    fn alert() -> AlertMessage {
        AlertMessage::new(PriceSnapshot::new("bitcoin", 63.0, Utc::now()), vec![Condition::below(64.0)])
    }

    #[tokio::test]
    async fn test_missing_credentials_reported_on_send() {
        let notifier = EmailNotifier::new(EmailSettings {
            sender_email: "bot@example.com".into(),
            sender_password: String::new(),
            receiver_email: String::new(),
        });

        let err = notifier.dispatch(&alert()).await.unwrap_err();
        match err {
            NotifyError::MissingCredentials(fields) => {
                assert_eq!(fields, vec!["sender_password", "receiver_email"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_address_rejected_before_connecting() {
        let notifier = EmailNotifier::new(EmailSettings {
            sender_email: "not-an-email".into(),
            sender_password: "secret".into(),
            receiver_email: "me@example.com".into(),
        });

        let err = notifier.dispatch(&alert()).await.unwrap_err();
        assert!(matches!(err, NotifyError::InvalidAddress(_)));
    }

    #[test]
    fn test_build_message_with_complete_settings() {
        let notifier = EmailNotifier::new(EmailSettings {
            sender_email: "bot@example.com".into(),
            sender_password: "secret".into(),
            receiver_email: "me@example.com".into(),
        });
        let alert = alert();
        let message = notifier.build_message(alert.subject(), alert.body()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("From: bot@example.com"));
        assert!(raw.contains("To: me@example.com"));
        assert_eq!(notifier.channel(), AlertChannel::Email);
    }
}
