//! Error types shared across the relay.
//!
//! `ContactError` is what the `/api/contact` handler returns; it renders itself
//! as a `SubmissionResult` body so clients always see the same JSON shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, info};

use crate::contact::SubmissionResult;

/// Message returned to clients for any delivery-side failure.
pub const GENERIC_FAILURE: &str = "Failed to send message. Please try again later.";

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors raised while building or sending outbound mail.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("failed to build SMTP transport: {0}")]
    Transport(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Errors surfaced by the contact endpoint.
#[derive(Debug, Error)]
pub enum ContactError {
    /// Client-correctable input problem; the message is shown to the caller.
    #[error("{0}")]
    Validation(&'static str),

    /// Transport, network or auth failure; never shown to the caller.
    #[error("delivery failed: {0}")]
    Delivery(#[from] MailError),
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ContactError::Validation(msg) => {
                info!(reason = %msg, "contact_validation_failed");
                SubmissionResult::failed(msg)
            }
            ContactError::Delivery(e) => {
                error!(error = %e, "contact_delivery_failed");
                SubmissionResult::failed(GENERIC_FAILURE)
            }
        };

        (status, Json(body)).into_response()
    }
}
