//! Per-client sliding-window rate limiting for the contact endpoint.
//!
//! Each client keeps a log of admitted request times. A request is admitted
//! when fewer than `max_requests` entries fall inside the trailing window;
//! rejected requests are not recorded.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::AppState;

pub const RATE_LIMITED_MESSAGE: &str = "Too many contact requests, please try again later.";

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");
const RATE_LIMIT_POLICY: HeaderName = HeaderName::from_static("ratelimit-policy");

/// Outcome of a single rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: usize,
    pub remaining: usize,
    pub window: Duration,
    /// Time until the oldest logged request leaves the window.
    pub reset_after: Duration,
}

#[derive(Debug)]
struct Windows {
    clients: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

/// Sliding-window limiter keyed by client identity.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(Windows {
                clients: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Record a request from `client` if it fits in the window.
    pub async fn check(&self, client: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if now.duration_since(windows.last_sweep) >= self.window {
            self.sweep(&mut windows, now);
        }

        let log = windows.clients.entry(client.to_string()).or_default();
        while let Some(&oldest) = log.front() {
            if now.duration_since(oldest) >= self.window {
                log.pop_front();
            } else {
                break;
            }
        }

        let allowed = log.len() < self.max_requests;
        if allowed {
            log.push_back(now);
        }

        let reset_after = log
            .front()
            .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
            .unwrap_or(self.window);

        RateLimitDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(log.len()),
            window: self.window,
            reset_after,
        }
    }

    /// Number of admitted requests for `client` still inside the window.
    #[cfg(test)]
    async fn count(&self, client: &str) -> usize {
        let now = Instant::now();
        let windows = self.windows.lock().await;
        windows
            .clients
            .get(client)
            .map(|log| {
                log.iter()
                    .filter(|&&t| now.duration_since(t) < self.window)
                    .count()
            })
            .unwrap_or(0)
    }

    fn sweep(&self, windows: &mut Windows, now: Instant) {
        let before = windows.clients.len();
        windows.clients.retain(|_, log| {
            log.back()
                .map(|&newest| now.duration_since(newest) < self.window)
                .unwrap_or(false)
        });
        windows.last_sweep = now;

        debug!(
            clients_before = before,
            clients_after = windows.clients.len(),
            "rate_limiter_swept"
        );
    }
}

/// Middleware guarding the contact route.
pub async fn limit_contact_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let decision = state.limiter.check(&client).await;

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        warn!(
            client = %client,
            limit = decision.limit,
            reset_after_secs = decision.reset_after.as_secs(),
            "contact_rate_limited"
        );
        let mut response = (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE).into_response();
        response
            .headers_mut()
            .insert(axum::http::header::RETRY_AFTER, seconds(decision.reset_after));
        response
    };

    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(RATE_LIMIT_RESET, seconds(decision.reset_after));
    if let Ok(policy) = HeaderValue::from_str(&policy(&decision)) {
        headers.insert(RATE_LIMIT_POLICY, policy);
    }

    response
}

/// Client identity: the peer IP address of the connection.
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Draft-6 policy string, e.g. `5;w=900`.
fn policy(decision: &RateLimitDecision) -> String {
    format!("{};w={}", decision.limit, decision.window.as_secs())
}

/// Whole seconds, rounded up.
fn seconds(duration: Duration) -> HeaderValue {
    let mut secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs += 1;
    }
    HeaderValue::from(secs)
}
