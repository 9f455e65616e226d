//! In-process HMAC using the RustCrypto `hmac` and `sha2` crates.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{HmacEngine, HmacError};

type HmacSha256 = Hmac<Sha256>;

/// Synchronous engine; the digest is computed inline on the calling task.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl NativeEngine {
    /// Blocking digest computation.
    pub fn compute(secret: &[u8], message: &[u8]) -> Result<String, HmacError> {
        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| HmacError::InvalidKey(e.to_string()))?;
        mac.update(message);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl HmacEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn hmac_sha256_hex(&self, secret: &[u8], message: &[u8]) -> Result<String, HmacError> {
        Self::compute(secret, message)
    }
}
