//! HMAC-SHA256 engines.
//!
//! Callers only see [`HmacEngine`]. Which implementation backs it is decided once at
//! startup by [`select_engine`], depending on the engines compiled into the binary
//! (`native` and `ring` cargo features) and the operator's [`BackendPreference`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::config::BackendPreference;

#[cfg(feature = "native")]
mod native;
#[cfg(feature = "ring")]
mod ring_engine;

#[cfg(feature = "native")]
pub use native::NativeEngine;
#[cfg(feature = "ring")]
pub use ring_engine::RingEngine;

/// Errors raised while computing a digest.
#[derive(Debug, Error)]
pub enum HmacError {
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),

    #[error("HMAC computation task failed: {0}")]
    Task(String),
}

/// Capability to compute a lowercase hex HMAC-SHA256 digest.
#[async_trait]
pub trait HmacEngine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    /// HMAC-SHA256 of `message` keyed by `secret`, lowercase hex encoded.
    async fn hmac_sha256_hex(&self, secret: &[u8], message: &[u8]) -> Result<String, HmacError>;
}

/// Pick an engine among those compiled in.
///
/// `Auto` prefers the native engine. An explicit preference for an engine that is not
/// available falls back to probing. Returns `None` when no engine was compiled in.
pub fn select_engine(preference: BackendPreference) -> Option<Arc<dyn HmacEngine>> {
    match preference {
        BackendPreference::Auto => {}
        BackendPreference::Native => match native_engine() {
            Some(engine) => return Some(engine),
            None => warn!(requested = %preference, "hmac_backend_unavailable_probing"),
        },
        BackendPreference::Ring => match ring_engine() {
            Some(engine) => return Some(engine),
            None => warn!(requested = %preference, "hmac_backend_unavailable_probing"),
        },
    }

    native_engine().or_else(ring_engine)
}

fn native_engine() -> Option<Arc<dyn HmacEngine>> {
    #[cfg(feature = "native")]
    {
        Some(Arc::new(NativeEngine))
    }
    #[cfg(not(feature = "native"))]
    {
        None
    }
}

fn ring_engine() -> Option<Arc<dyn HmacEngine>> {
    #[cfg(feature = "ring")]
    {
        Some(Arc::new(RingEngine))
    }
    #[cfg(not(feature = "ring"))]
    {
        None
    }
}
