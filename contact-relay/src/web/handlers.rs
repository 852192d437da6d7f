//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::contact::{ContactForm, ContactRelay, SubmissionResult, INVALID_BODY, MISSING_FIELDS};
use crate::error::ContactError;
use crate::web::rate_limit::RateLimiter;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ContactRelay>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(relay: ContactRelay, limiter: RateLimiter) -> Self {
        Self {
            relay: Arc::new(relay),
            limiter: Arc::new(limiter),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Server is running",
    })
}

// =============================================================================
// Contact Form
// =============================================================================

/// Contact form endpoint.
///
/// Rate limiting happens in middleware before this runs. A body sent without
/// a JSON content type is treated as an empty form.
pub async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<SubmissionResult>, ContactError> {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(JsonRejection::MissingJsonContentType(rejection)) => {
            warn!(error = %rejection, "contact_body_not_json");
            return Err(ContactError::Validation(MISSING_FIELDS));
        }
        Err(rejection) => {
            warn!(error = %rejection, "contact_body_rejected");
            return Err(ContactError::Validation(INVALID_BODY));
        }
    };

    let result = state.relay.handle(form).await?;
    Ok(Json(result))
}
