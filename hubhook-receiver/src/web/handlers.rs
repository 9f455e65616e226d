//! Webhook endpoint handlers.
//!
//! Event deliveries are acknowledged with an empty 200 no matter what: the body may not
//! parse and the signature may not verify, but both only show up in the logs.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;

use crate::sink::{Delivery, DeliverySink};
use crate::web::signature::SignatureVerifier;
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<SignatureVerifier>,
    pub sink: Arc<dyn DeliverySink>,
}

impl AppState {
    pub fn new(config: Config, verifier: SignatureVerifier, sink: Arc<dyn DeliverySink>) -> Self {
        Self {
            config: Arc::new(config),
            verifier: Arc::new(verifier),
            sink,
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
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Event Delivery
// =============================================================================

/// POST / handler.
///
/// The body is taken as raw bytes; those same bytes are hashed for the signature check
/// and parsed for the log, so formatting never affects verification.
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let verification = state.verifier.verify(&body, &headers).await;
    let delivery = Delivery::new(&headers, &body, verification);
    state.sink.record(&delivery);

    StatusCode::OK
}
