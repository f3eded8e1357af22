//! Contact-form relay over SMTP.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::template::{RenderedMail, render};
use crate::config::MailConfig;
use crate::domain::ContactMessage;
use crate::error::SiteError;

/// Delivers one rendered message. Implementations attempt delivery once.
#[async_trait]
pub trait MailTransport: fmt::Debug + Send + Sync {
    /// Sends `mail`, returning the server's acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when the visitor address cannot be
    /// used, or [`SiteError::Delivery`] when the relay fails.
    async fn deliver(&self, mail: &RenderedMail) -> Result<String, SiteError>;
}

/// SMTP relay built on `lettre`.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Address,
    to: Mailbox,
}

impl fmt::Debug for SmtpRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpRelay")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

impl SmtpRelay {
    /// Builds the relay. Port 465 uses implicit TLS, other ports STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Delivery`] if the TLS setup fails or the
    /// configured addresses are invalid.
    pub fn new(config: &MailConfig) -> Result<Self, SiteError> {
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| SiteError::Delivery(format!("smtp setup for {}: {e}", config.host)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        let from: Address = config
            .from
            .parse()
            .map_err(|e| SiteError::Delivery(format!("invalid EMAIL_FROM {}: {e}", config.from)))?;
        let to: Mailbox = config
            .to
            .parse()
            .map_err(|e| SiteError::Delivery(format!("invalid EMAIL_TO {}: {e}", config.to)))?;

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    fn build_message(&self, mail: &RenderedMail) -> Result<Message, SiteError> {
        let reply_to: Address = mail.reply_to.parse().map_err(|_| {
            SiteError::Validation(format!("invalid email address: {}", mail.reply_to))
        })?;

        Message::builder()
            .from(Mailbox::new(Some(mail.sender_name.clone()), self.from.clone()))
            .reply_to(Mailbox::new(Some(mail.sender_name.clone()), reply_to))
            .to(self.to.clone())
            .subject(mail.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                mail.text.clone(),
                mail.html.clone(),
            ))
            .map_err(|e| SiteError::Delivery(format!("message build: {e}")))
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn deliver(&self, mail: &RenderedMail) -> Result<String, SiteError> {
        let message = self.build_message(mail)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| SiteError::Delivery(e.to_string()))?;
        Ok(response.message().collect::<Vec<_>>().join(" "))
    }
}

/// Renders contact messages and relays them through a [`MailTransport`].
#[derive(Debug, Clone)]
pub struct Mailer {
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    /// Creates a mailer over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Creates a mailer relaying through SMTP.
    ///
    /// # Errors
    ///
    /// See [`SmtpRelay::new`].
    pub fn smtp(config: &MailConfig) -> Result<Self, SiteError> {
        Ok(Self::new(Arc::new(SmtpRelay::new(config)?)))
    }

    /// Validates, renders and sends a contact message. Delivery is attempted
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for missing fields or an unusable
    /// visitor address, and [`SiteError::Delivery`] when the relay fails.
    pub async fn send(&self, message: ContactMessage) -> Result<(), SiteError> {
        let message = message.normalized()?;
        let mail = render(&message);
        match self.transport.deliver(&mail).await {
            Ok(ack) => {
                tracing::info!(reply_to = %mail.reply_to, %ack, "contact message relayed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(reply_to = %mail.reply_to, error = %e, "contact message not relayed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        sent: Mutex<Vec<RenderedMail>>,
        fail: bool,
    }

    #[async_trait]
    impl MailTransport for Recorder {
        async fn deliver(&self, mail: &RenderedMail) -> Result<String, SiteError> {
            if self.fail {
                return Err(SiteError::Delivery("connection refused".to_string()));
            }
            self.sent.lock().await.push(mail.clone());
            Ok("250 OK".to_string())
        }
    }

    fn contact() -> ContactMessage {
        ContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn send_renders_and_delivers_once() {
        let recorder = Arc::new(Recorder::default());
        let mailer = Mailer::new(Arc::clone(&recorder) as Arc<dyn MailTransport>);

        assert!(mailer.send(contact()).await.is_ok());
        let sent = recorder.sent.lock().await;
        assert_eq!(sent.len(), 1);
        let Some(mail) = sent.first() else {
            panic!("nothing sent");
        };
        assert_eq!(mail.reply_to, "ada@example.com");
    }

    #[tokio::test]
    async fn invalid_fields_never_reach_transport() {
        let recorder = Arc::new(Recorder::default());
        let mailer = Mailer::new(Arc::clone(&recorder) as Arc<dyn MailTransport>);

        let mut msg = contact();
        msg.name = String::new();
        assert!(matches!(
            mailer.send(msg).await,
            Err(SiteError::Validation(_))
        ));
        assert!(recorder.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_delivery_error() {
        let mailer = Mailer::new(Arc::new(Recorder {
            fail: true,
            ..Default::default()
        }));
        assert!(matches!(
            mailer.send(contact()).await,
            Err(SiteError::Delivery(_))
        ));
    }

    #[tokio::test]
    async fn smtp_message_uses_site_sender_and_visitor_reply_to() {
        let config = MailConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "site@example.com".to_string(),
            password: "pw".to_string(),
            to: "owner@example.com".to_string(),
            from: "site@example.com".to_string(),
            timeout_secs: 5,
        };
        let Ok(relay) = SmtpRelay::new(&config) else {
            panic!("relay construction failed");
        };
        let mail = render(&contact());
        let Ok(message) = relay.build_message(&mail) else {
            panic!("message build failed");
        };
        let formatted = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(formatted.contains("Reply-To:"));
        assert!(formatted.contains("<ada@example.com>"));
        assert!(formatted.contains("<site@example.com>"));
        assert!(formatted.contains("owner@example.com"));

        let mut bad = mail;
        bad.reply_to = "nope".to_string();
        assert!(matches!(
            relay.build_message(&bad),
            Err(SiteError::Validation(_))
        ));
    }
}
