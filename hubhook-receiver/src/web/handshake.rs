//! Subscription handshake.
//!
//! When a subscription is created the platform sends
//! `GET /?hub.mode=subscribe&hub.challenge=<c>&hub.verify_token=<t>` and expects `<c>`
//! echoed back with 200 when `<t>` matches our verify token.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::web::signature::constant_time_eq;
use crate::web::AppState;

/// Mode value sent for subscription requests.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Handshake query parameters. All optional; missing ones fail the check.
#[derive(Debug, Default, Deserialize)]
pub struct HandshakeQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
}

/// Decide the handshake. Returns the challenge to echo, or `None` to reject.
pub fn accept_handshake(expected_token: Option<&str>, query: HandshakeQuery) -> Option<String> {
    let expected = expected_token?;
    let mode_ok = query.mode.as_deref() == Some(SUBSCRIBE_MODE);
    let token_ok = query
        .verify_token
        .as_deref()
        .is_some_and(|t| constant_time_eq(t.as_bytes(), expected.as_bytes()));

    (mode_ok && token_ok).then(|| query.challenge.unwrap_or_default())
}

/// GET / handler.
///
/// An unparsable query string is treated like missing parameters.
pub async fn handshake(
    State(state): State<AppState>,
    query: Option<Query<HandshakeQuery>>,
) -> Response {
    let query = query.map(|Query(q)| q).unwrap_or_default();

    match accept_handshake(state.config.verify_token.as_deref(), query) {
        Some(challenge) => {
            info!(challenge_length = challenge.len(), "handshake_verified");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                challenge,
            )
                .into_response()
        }
        None => {
            warn!("handshake_rejected");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(mode: Option<&str>, challenge: Option<&str>, token: Option<&str>) -> HandshakeQuery {
        HandshakeQuery {
            mode: mode.map(str::to_string),
            challenge: challenge.map(str::to_string),
            verify_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_accepts_subscribe_with_matching_token() {
        let q = query(Some("subscribe"), Some("xyz123"), Some("my-token"));
        assert_eq!(accept_handshake(Some("my-token"), q), Some("xyz123".to_string()));
    }

    #[test]
    fn test_challenge_echoed_verbatim() {
        let q = query(Some("subscribe"), Some(" a b+c/=  "), Some("t"));
        assert_eq!(accept_handshake(Some("t"), q), Some(" a b+c/=  ".to_string()));
    }

    #[test]
    fn test_rejects_wrong_mode() {
        let q = query(Some("unsubscribe"), Some("xyz123"), Some("my-token"));
        assert_eq!(accept_handshake(Some("my-token"), q), None);

        let q = query(Some("Subscribe"), Some("xyz123"), Some("my-token"));
        assert_eq!(accept_handshake(Some("my-token"), q), None);
    }

    #[test]
    fn test_rejects_wrong_token() {
        let q = query(Some("subscribe"), Some("xyz123"), Some("other"));
        assert_eq!(accept_handshake(Some("my-token"), q), None);

        let q = query(Some("subscribe"), Some("xyz123"), Some("my-token "));
        assert_eq!(accept_handshake(Some("my-token"), q), None);
    }

    #[test]
    fn test_rejects_missing_params() {
        assert_eq!(accept_handshake(Some("my-token"), HandshakeQuery::default()), None);
        let q = query(None, Some("xyz123"), Some("my-token"));
        assert_eq!(accept_handshake(Some("my-token"), q), None);
        let q = query(Some("subscribe"), Some("xyz123"), None);
        assert_eq!(accept_handshake(Some("my-token"), q), None);
    }

    #[test]
    fn test_rejects_when_token_not_configured() {
        let q = query(Some("subscribe"), Some("xyz123"), Some(""));
        assert_eq!(accept_handshake(None, q), None);
    }

    #[test]
    fn test_missing_challenge_echoes_empty() {
        let q = query(Some("subscribe"), None, Some("my-token"));
        assert_eq!(accept_handshake(Some("my-token"), q), Some(String::new()));
    }
}
