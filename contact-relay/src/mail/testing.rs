//! In-memory `Mailer` fakes for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Mailer, OutboundMessage};
use crate::error::MailError;

/// Records every message and fails once `fail_from` sends have succeeded.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundMessage>>,
    fail_from: Option<usize>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails.
    pub fn failing() -> Self {
        Self::failing_after(0)
    }

    /// The first `n` sends succeed, later ones fail.
    pub fn failing_after(n: usize) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_from: Some(n),
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        let mut sent = self.sent.lock().unwrap();
        if let Some(limit) = self.fail_from {
            if sent.len() >= limit {
                return Err(MailError::Smtp("421 service not available".to_string()));
            }
        }
        sent.push(message);
        Ok(())
    }
}
