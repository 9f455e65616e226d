//! Hubhook Web Server - Graph API webhook receiver.
//!
//! This binary:
//! - Answers the platform's subscription handshake
//! - Receives event deliveries and verifies their `X-Hub-Signature-256`
//! - Logs every delivery with its verification verdict
//! - Returns 200 OK for every delivery

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hubhook::{router, select_engine, AppState, Config, LogFormat, SignatureVerifier, TracingSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging comes up before the rest of the config so parse warnings are kept
    let log_format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse::<LogFormat>().ok())
        .unwrap_or_default();
    init_tracing(log_format);

    info!("web_server_starting");

    // Load configuration from environment
    let config = Config::from_env();

    let verifier = SignatureVerifier::new(
        config.app_secret.clone(),
        select_engine(config.hmac_backend),
    );
    info!(
        port = config.port,
        verify_token_configured = config.verify_token.is_some(),
        signature_verification_enabled = config.signature_verification_enabled(),
        hmac_backend_requested = %config.hmac_backend,
        log_format = ?config.log_format,
        hmac_engine = verifier.engine_name().unwrap_or("none"),
        "config_loaded"
    );

    if config.verify_token.is_none() {
        warn!("verify_token_not_configured");
    }
    if !config.signature_verification_enabled() {
        warn!("app_secret_not_configured");
    }
    if verifier.engine_name().is_none() {
        warn!("no_hmac_engine_available");
    }

    // Create application state
    let port = config.port;
    let state = AppState::new(config, verifier, Arc::new(TracingSink));

    // Build the router
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json().flatten_event(true)).init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
