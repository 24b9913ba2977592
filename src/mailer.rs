use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::error::SendError;

/// How the connection to the relay is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// No TLS at all.
    Plain,
    /// STARTTLS is required before the message is sent.
    Tls,
}

impl Security {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Security::Tls)
    }
}

/// Where and how one test email is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relay {
    pub host: String,
    pub port: u16,
    pub security: Security,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEmail {
    pub sender: Mailbox,
    pub recipient: Mailbox,
    pub subject: String,
    pub body: String,
}

impl TestEmail {
    pub fn new(sender: Mailbox, recipient: Mailbox, hostname: &str, security: Security) -> Self {
        let suffix = if security.is_encrypted() {
            " (SSL enabled)"
        } else {
            ""
        };
        TestEmail {
            sender,
            recipient,
            subject: format!("Email test from {hostname}"),
            body: format!("This is a test email sent from {hostname}{suffix}"),
        }
    }

    pub fn to_message(&self) -> Result<Message, SendError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(&self.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())?;
        Ok(message)
    }
}

/// Dispatches one message and waits for the relay's answer.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &TestEmail, relay: &Relay) -> Result<(), SendError>;
}

/// Sends through a real SMTP relay. A fresh transport is built for every
/// attempt and dropped when the attempt ends.
#[derive(Debug, Clone, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    fn transport(relay: &Relay) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendError> {
        let builder = match relay.security {
            Security::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&relay.host),
            Security::Tls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&relay.host)?,
        };
        Ok(builder.port(relay.port).build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &TestEmail, relay: &Relay) -> Result<(), SendError> {
        let message = email.to_message()?;
        let mailer = Self::transport(relay)?;

        let response = mailer.send(message).await?;
        debug!(
            host = %relay.host,
            port = relay.port,
            security = ?relay.security,
            code = %response.code(),
            "relay accepted test email"
        );
        Ok(())
    }
}
