//! JWT claim decoding
//!
//! The console cannot verify token signatures (the key lives on the server),
//! so this only reads the payload to learn the expiry and role. The server
//! still validates every request.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading a token payload
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Token does not have the `header.payload.signature` shape
    #[error("token is not a JWT")]
    NotJwt,

    /// Payload segment is not valid base64url
    #[error("token payload is not valid base64: {0}")]
    Encoding(String),

    /// Payload is not the expected JSON object
    #[error("token payload is not valid JSON: {0}")]
    Payload(String),
}

/// The subset of claims the console cares about
///
/// Each claim is read on its own, so an oddly typed `sub` or `rol` never
/// hides the expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    pub sub: Option<String>,
    /// Expiry as seconds since the Unix epoch
    pub exp: Option<i64>,
    pub rol: Option<String>,
}

impl Claims {
    fn from_payload(payload: &serde_json::Map<String, Value>) -> Self {
        Self {
            sub: payload.get("sub").and_then(scalar_text),
            exp: payload.get("exp").and_then(|exp| {
                exp.as_i64()
                    .or_else(|| exp.as_f64().map(|secs| secs as i64))
            }),
            rol: payload.get("rol").and_then(scalar_text),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Strings as-is, numbers in their decimal form; anything else is ignored
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Decode the claims of a JWT without checking its signature
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(TokenError::NotJwt),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(payload)) => Ok(Claims::from_payload(&payload)),
        Ok(other) => Err(TokenError::Payload(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(TokenError::Payload(e.to_string())),
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}
