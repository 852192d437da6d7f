//! Contact form handling.
//!
//! ```text
//! ContactForm → validate() → Submission → notification (+ acknowledgment) → Mailer
//! ```

pub mod compose;
pub mod relay;
pub mod validation;

use serde::Serialize;

pub use relay::{ContactRelay, RelaySettings};
pub use validation::{
    is_valid_email, ContactForm, Submission, INVALID_BODY, INVALID_EMAIL, MISSING_FIELDS,
};

pub const SUCCESS_MESSAGE: &str = "Message sent successfully!";

/// JSON body returned by `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: Some(SUCCESS_MESSAGE.to_string()),
            error: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }
}
