//! Delivery signature verification.
//!
//! The platform signs every event delivery with HMAC-SHA256 over the raw request body,
//! keyed by the app secret, and sends it as `X-Hub-Signature-256: sha256=<hex>`.
//! Reference: https://developers.facebook.com/docs/graph-api/webhooks/getting-started#validate-payloads
//!
//! Verification never fails the request; the outcome is only logged.

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::crypto::HmacEngine;

/// Preferred signature header.
pub const SIGNATURE_256_HEADER: &str = "x-hub-signature-256";

/// Legacy signature header, read only when the SHA-256 header is absent.
pub const SIGNATURE_LEGACY_HEADER: &str = "x-hub-signature";

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Why a verification ended the way it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationReason {
    Ok,
    SecretNotConfigured,
    MissingHeader,
    NoHmacCapability,
    LengthMismatch,
    Mismatch,
    /// The engine failed; carries the error description.
    Engine(String),
}

impl fmt::Display for VerificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::SecretNotConfigured => f.write_str("secret not configured"),
            Self::MissingHeader => f.write_str("missing signature header"),
            Self::NoHmacCapability => f.write_str("no HMAC capability available"),
            Self::LengthMismatch => f.write_str("length mismatch"),
            Self::Mismatch => f.write_str("mismatch"),
            Self::Engine(description) => f.write_str(description),
        }
    }
}

/// Outcome of a signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub valid: bool,
    pub reason: VerificationReason,
}

impl VerificationResult {
    fn accepted() -> Self {
        Self {
            valid: true,
            reason: VerificationReason::Ok,
        }
    }

    fn rejected(reason: VerificationReason) -> Self {
        Self {
            valid: false,
            reason,
        }
    }
}

/// Verifies `X-Hub-Signature-256` headers against the configured app secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Option<String>,
    engine: Option<Arc<dyn HmacEngine>>,
}

impl SignatureVerifier {
    /// Create a verifier. An empty secret disables verification.
    pub fn new(secret: Option<String>, engine: Option<Arc<dyn HmacEngine>>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            engine,
        }
    }

    /// Name of the engine in use, if any.
    pub fn engine_name(&self) -> Option<&'static str> {
        self.engine.as_ref().map(|e| e.name())
    }

    /// Verify `body` (the exact bytes received) against the signature in `headers`.
    pub async fn verify(&self, body: &[u8], headers: &HeaderMap) -> VerificationResult {
        let Some(secret) = self.secret.as_deref() else {
            return VerificationResult::rejected(VerificationReason::SecretNotConfigured);
        };

        let Some(provided) = signature_header(headers) else {
            return VerificationResult::rejected(VerificationReason::MissingHeader);
        };

        let Some(engine) = self.engine.as_ref() else {
            return VerificationResult::rejected(VerificationReason::NoHmacCapability);
        };

        let digest = match engine.hmac_sha256_hex(secret.as_bytes(), body).await {
            Ok(d) => d,
            Err(e) => {
                return VerificationResult::rejected(VerificationReason::Engine(e.to_string()));
            }
        };
        let expected = format!("{SIGNATURE_PREFIX}{digest}");

        // Length is public: fixed by the digest algorithm.
        if expected.len() != provided.len() {
            debug!(
                expected_length = expected.len(),
                actual_length = provided.len(),
                "signature_length_mismatch"
            );
            return VerificationResult::rejected(VerificationReason::LengthMismatch);
        }

        if constant_time_eq(expected.as_bytes(), provided) {
            VerificationResult::accepted()
        } else {
            VerificationResult::rejected(VerificationReason::Mismatch)
        }
    }
}

/// Raw value of the signature header, SHA-256 variant first.
pub fn signature_header(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(SIGNATURE_256_HEADER)
        .or_else(|| headers.get(SIGNATURE_LEGACY_HEADER))
        .map(|v| v.as_bytes())
}

/// Equal-length comparison without content-dependent branches.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}
