//! Transactional email over SMTP
//!
//! One pooled async transport is built at startup. When `SMTP_HOST` is unset
//! the mailer runs disabled: messages are logged and dropped.

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    frontend_url: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let from: Mailbox = config.email_from.parse()?;

        let transport = match &config.smtp.host {
            Some(host) => {
                let mut builder =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(config.smtp.port);
                if let (Some(user), Some(pass)) = (&config.smtp.username, &config.smtp.password) {
                    builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
                }
                tracing::info!(host = %host, port = config.smtp.port, "SMTP mailer configured");
                Some(builder.build())
            }
            None => {
                tracing::warn!("SMTP_HOST not set, outgoing email is disabled");
                None
            }
        };

        Ok(Self {
            transport,
            from,
            frontend_url: config.frontend_url.clone(),
        })
    }

    /// Mailer that only logs; used by tests
    pub fn disabled(from: Mailbox, frontend_url: impl Into<String>) -> Self {
        Self {
            transport: None,
            from,
            frontend_url: frontend_url.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Link embedded in password reset emails
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password/{token}", self.frontend_url)
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        let Some(transport) = &self.transport else {
            tracing::info!(to = to, subject = subject, "Email disabled, message dropped");
            return Ok(());
        };

        transport.send(message).await?;
        tracing::info!(to = to, subject = subject, "Email sent");
        Ok(())
    }

    pub async fn send_welcome(&self, to: &str, restaurant_name: &str) -> Result<(), MailError> {
        let body = format!(
            "Welcome to MenuQR, {restaurant_name}!\n\n\
             Your account is ready. Create your first menu, print its QR code \
             and let your customers browse and order from their phones.\n\n\
             {}\n",
            self.frontend_url
        );
        self.send(to, "Welcome to MenuQR", body).await
    }

    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), MailError> {
        let body = format!(
            "We received a request to reset your MenuQR password.\n\n\
             Open the link below to choose a new one:\n{}\n\n\
             The link expires in 1 hour. If you did not ask for this, ignore this email.\n",
            self.reset_link(token)
        );
        self.send(to, "Reset your MenuQR password", body).await
    }

    pub async fn send_password_changed(&self, to: &str) -> Result<(), MailError> {
        let body = "Your MenuQR password was just changed.\n\n\
                    If this was not you, reset your password immediately.\n"
            .to_string();
        self.send(to, "Your MenuQR password was changed", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> Mailer {
        Mailer::disabled(
            "MenuQR <noreply@menuqr.app>".parse().unwrap(),
            "https://app.menuqr.test",
        )
    }

    #[test]
    fn reset_link_uses_frontend_url() {
        assert_eq!(
            mailer().reset_link("abc123"),
            "https://app.menuqr.test/reset-password/abc123"
        );
    }

    #[tokio::test]
    async fn disabled_mailer_accepts_messages() {
        let m = mailer();
        assert!(!m.is_enabled());
        m.send_welcome("chef@example.com", "Chez Test").await.unwrap();
    }

    #[tokio::test]
    async fn bad_recipient_is_an_error() {
        let err = mailer().send_password_changed("not an address").await;
        assert!(matches!(err, Err(MailError::Address(_))));
    }
}
