//! Contact relay server.
//!
//! Serves `POST /api/contact` and `GET /api/health`, relaying submissions to
//! the configured SMTP provider.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use contact_relay::{router, AppState, Config, ContactRelay, RateLimiter, RelaySettings, SmtpMailer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("contact_relay_starting");

    match dotenv {
        Ok(path) => info!(path = %path.display(), "dotenv_loaded"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "dotenv_load_failed"),
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        environment = %config.environment,
        provider = config.transport.provider(),
        email_to = %config.email_to,
        send_confirmation = config.send_confirmation,
        rate_limit_max = config.rate_limit_max,
        rate_limit_window_secs = config.rate_limit_window.as_secs(),
        "config_loaded"
    );

    let mailer = SmtpMailer::new(&config.transport).context("Failed to build SMTP transport")?;
    let relay = ContactRelay::new(Arc::new(mailer), RelaySettings::from(&config));
    let limiter = RateLimiter::new(config.rate_limit_max, config.rate_limit_window);

    let app = router(AppState::new(relay, limiter));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "contact_relay_listening");

    // Peer addresses feed the per-client rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("contact_relay_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("contact_relay_shutting_down");
}
