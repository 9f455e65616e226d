//! Where received deliveries are reported.
//!
//! Handlers never write logs for a delivery directly; they build a [`Delivery`] and hand
//! it to the [`DeliverySink`] in the application state. Production uses [`TracingSink`].

use axum::http::HeaderMap;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::web::signature::VerificationResult;

/// One received event delivery.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub received_at: DateTime<Utc>,
    /// Request headers as a JSON object.
    pub headers: Value,
    /// Parsed body, or a note explaining why it could not be parsed.
    pub body: Result<Value, String>,
    pub body_length: usize,
    pub verification: VerificationResult,
}

impl Delivery {
    /// Build a delivery from the raw request parts.
    pub fn new(headers: &HeaderMap, raw_body: &[u8], verification: VerificationResult) -> Self {
        Self {
            received_at: Utc::now(),
            headers: headers_to_json(headers),
            body: serde_json::from_slice(raw_body)
                .map_err(|e| format!("body is not valid JSON: {e}")),
            body_length: raw_body.len(),
            verification,
        }
    }
}

/// Receives every delivery handled by the server.
pub trait DeliverySink: Send + Sync {
    fn record(&self, delivery: &Delivery);
}

/// Writes deliveries to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DeliverySink for TracingSink {
    fn record(&self, delivery: &Delivery) {
        let received_at = delivery
            .received_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let headers = pretty(&delivery.headers);

        match &delivery.body {
            Ok(body) => {
                info!(
                    received_at = %received_at,
                    headers = %headers,
                    body = %pretty(body),
                    body_length = delivery.body_length,
                    signature_valid = delivery.verification.valid,
                    signature_reason = %delivery.verification.reason,
                    "webhook_received"
                );
            }
            Err(note) => {
                warn!(
                    received_at = %received_at,
                    error = %note,
                    body_length = delivery.body_length,
                    "webhook_body_unparsable"
                );
                info!(
                    received_at = %received_at,
                    headers = %headers,
                    body = %note,
                    body_length = delivery.body_length,
                    signature_valid = delivery.verification.valid,
                    signature_reason = %delivery.verification.reason,
                    "webhook_received"
                );
            }
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}

/// Convert headers to a JSON object. Repeated headers become arrays.
pub fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();

    for name in headers.keys() {
        let mut values: Vec<Value> = headers
            .get_all(name)
            .iter()
            .map(|v| Value::String(String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();

        let entry = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::Array(values)
        };
        map.insert(name.as_str().to_string(), entry);
    }

    Value::Object(map)
}
