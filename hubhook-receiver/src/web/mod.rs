//! Web server module for the webhook endpoint.
//!
//! This module provides a small web server that:
//! - Answers the subscription handshake on `GET /`
//! - Receives event deliveries on `POST /`, verifies their signature and logs them
//! - Always acknowledges deliveries with 200 OK
//!
//! The router is built here so tests can drive it without binding a socket.

pub mod handlers;
pub mod handshake;
pub mod signature;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{health, receive_event, AppState, HealthResponse};
pub use handshake::{accept_handshake, handshake, HandshakeQuery};
pub use signature::{SignatureVerifier, VerificationReason, VerificationResult};

/// Largest delivery body accepted. Bigger requests are refused with 413 before the
/// handler runs, so they are neither acknowledged nor logged as deliveries.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handshake).post(receive_event))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
