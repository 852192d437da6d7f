//! Outbound message representation and conversion to a lettre `Message`.

use std::str::FromStr;

use lettre::message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart};

use crate::error::MailError;

/// A fully composed email, independent of the transport that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: Mailbox,
    pub to: Mailbox,
    pub reply_to: Option<Mailbox>,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl OutboundMessage {
    /// Build the RFC 5322 message with a `multipart/alternative` body.
    pub fn to_message(&self) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.clone());

        if let Some(reply_to) = &self.reply_to {
            builder = builder.reply_to(reply_to.clone());
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(self.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(self.html_body.clone()),
                    ),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

/// Parse an address into a mailbox, keeping the offending input in the error.
pub fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    Mailbox::from_str(address.trim()).map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
