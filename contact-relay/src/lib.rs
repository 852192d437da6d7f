//! Contact relay - forwards portfolio contact-form submissions by email.
//!
//! ## Architecture
//!
//! ```text
//! POST /api/contact → rate limiter → validation → compose → Mailer (SMTP)
//! ```
//!
//! The SMTP provider (Gmail, SendGrid, Resend or a custom server) is chosen
//! from the environment once at startup.

pub mod config;
pub mod contact;
pub mod error;
pub mod mail;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use contact::{ContactForm, ContactRelay, RelaySettings, Submission, SubmissionResult};
pub use error::{ConfigError, ContactError, MailError};
pub use mail::{Mailer, OutboundMessage, SmtpMailer, TransportConfig};
pub use web::{router, AppState, RateLimiter};
