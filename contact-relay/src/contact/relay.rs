//! The contact relay: validate, compose, deliver.

use std::sync::Arc;

use lettre::message::Mailbox;
use tracing::{info, warn};

use super::compose::{acknowledgment, notification};
use super::{ContactForm, SubmissionResult};
use crate::error::ContactError;
use crate::mail::{parse_mailbox, Mailer};
use crate::Config;

/// Addressing and behavior settings for the relay.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub from: Mailbox,
    pub to: Mailbox,
    pub send_confirmation: bool,
    pub owner_name: Option<String>,
}

impl From<&Config> for RelaySettings {
    fn from(config: &Config) -> Self {
        Self {
            from: config.email_from.clone(),
            to: config.email_to.clone(),
            send_confirmation: config.send_confirmation,
            owner_name: config.owner_name.clone(),
        }
    }
}

/// Forwards contact submissions to the site owner.
pub struct ContactRelay {
    mailer: Arc<dyn Mailer>,
    settings: RelaySettings,
}

impl ContactRelay {
    pub fn new(mailer: Arc<dyn Mailer>, settings: RelaySettings) -> Self {
        Self { mailer, settings }
    }

    /// Handle one submission.
    ///
    /// The owner notification must be delivered for the call to succeed. The
    /// acknowledgment is best-effort: its failure is logged and otherwise
    /// ignored.
    ///
    /// A submitter address that passes validation but is not a valid RFC 5322
    /// mailbox still reaches the owner, without `Reply-To`; no acknowledgment
    /// is attempted for it.
    pub async fn handle(&self, form: ContactForm) -> Result<SubmissionResult, ContactError> {
        let submission = form.validate()?;

        info!(
            subject_length = submission.subject.len(),
            message_length = submission.message.len(),
            "contact_submission_received"
        );

        let submitter = match parse_mailbox(&submission.email) {
            Ok(mailbox) => Some(mailbox),
            Err(e) => {
                warn!(email = %submission.email, error = %e, "contact_submitter_address_unusable");
                None
            }
        };

        let message = notification(
            &submission,
            &self.settings.from,
            &self.settings.to,
            submitter.as_ref(),
        );
        self.mailer.send(message).await?;

        info!("contact_notification_sent");

        if self.settings.send_confirmation {
            match &submitter {
                Some(to) => {
                    let message = acknowledgment(
                        &submission,
                        &self.settings.from,
                        to,
                        self.settings.owner_name.as_deref(),
                    );
                    match self.mailer.send(message).await {
                        Ok(()) => info!("contact_acknowledgment_sent"),
                        Err(e) => warn!(error = %e, "contact_acknowledgment_failed"),
                    }
                }
                None => warn!("contact_acknowledgment_skipped"),
            }
        }

        Ok(SubmissionResult::sent())
    }
}
