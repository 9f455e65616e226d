//! HMAC through `ring`, computed on the blocking thread pool.

use async_trait::async_trait;
use ring::hmac;

use super::{HmacEngine, HmacError};

/// Asynchronous engine: the digest is offloaded with `spawn_blocking` and awaited.
#[derive(Debug, Clone, Copy, Default)]
pub struct RingEngine;

#[async_trait]
impl HmacEngine for RingEngine {
    fn name(&self) -> &'static str {
        "ring"
    }

    async fn hmac_sha256_hex(&self, secret: &[u8], message: &[u8]) -> Result<String, HmacError> {
        let secret = secret.to_vec();
        let message = message.to_vec();

        tokio::task::spawn_blocking(move || {
            let key = hmac::Key::new(hmac::HMAC_SHA256, &secret);
            hex::encode(hmac::sign(&key, &message).as_ref())
        })
        .await
        .map_err(|e| HmacError::Task(e.to_string()))
    }
}
