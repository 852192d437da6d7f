//! Web server module for the contact API.
//!
//! Routes:
//! - `POST /api/contact`: rate limited, relays the submission by email
//! - `GET /api/health`: liveness probe

pub mod handlers;
pub mod rate_limit;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use handlers::{contact, health, AppState, HealthResponse};
pub use rate_limit::{limit_contact_requests, RateLimitDecision, RateLimiter, RATE_LIMITED_MESSAGE};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let contact_routes = Router::new()
        .route("/api/contact", post(contact))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_contact_requests,
        ));

    Router::new()
        .route("/api/health", get(health))
        .merge(contact_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
