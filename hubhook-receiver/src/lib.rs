//! Hubhook - receiver for Graph API webhook subscriptions.
//!
//! This library provides the modules for the `hubhook-web` binary:
//! - `config`: environment configuration, read once at startup
//! - `crypto`: interchangeable HMAC-SHA256 engines
//! - `web`: subscription handshake, event delivery endpoint, signature verification
//! - `sink`: where received deliveries are reported
//!
//! ## Flow
//!
//! ```text
//! GET  /  → handshake → 200 <challenge> | 403
//! POST /  → verify signature over raw body → DeliverySink → 200
//! ```

pub mod config;
pub mod crypto;
pub mod sink;
pub mod web;

// Re-export commonly used types
pub use config::{BackendPreference, Config, LogFormat};
pub use crypto::{select_engine, HmacEngine, HmacError};
pub use sink::{Delivery, DeliverySink, TracingSink};
pub use web::{router, AppState, SignatureVerifier, VerificationReason, VerificationResult};
