//! Outbound mail: message model, provider transports and the `Mailer` seam.

pub mod message;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, info};

use crate::error::MailError;

pub use message::{parse_mailbox, OutboundMessage};
pub use transport::{Secret, Security, SmtpAuth, TransportConfig};

/// Anything that can deliver an `OutboundMessage`.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError>;
}

/// `Mailer` backed by a lettre SMTP transport, built once at startup.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    provider: &'static str,
}

impl SmtpMailer {
    pub fn new(config: &TransportConfig) -> Result<Self, MailError> {
        let transport = config.build()?;

        info!(
            provider = config.provider(),
            host = %config.host(),
            port = config.port(),
            security = ?config.security(),
            authenticated = config.credentials().is_some(),
            "smtp_transport_built"
        );

        Ok(Self {
            transport,
            provider: config.provider(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        let email = message.to_message()?;

        debug!(provider = self.provider, subject = %message.subject, "smtp_send_start");

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        info!(
            provider = self.provider,
            code = %response.code(),
            "smtp_send_complete"
        );

        Ok(())
    }
}
