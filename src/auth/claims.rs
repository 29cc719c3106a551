//! Structural decoding of identity tokens.
//!
//! Decoding here is base64url + JSON only. It proves nothing about who
//! issued the token; see [`crate::auth::verify`] for the signature phase.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Identity assertions extracted from a token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsRecord {
    pub user_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,

    #[serde(rename = "iat", skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    #[serde(rename = "exp", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Why a token could not be turned into a [`ClaimsRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    #[error("token is not a three-segment base64url structure")]
    Malformed,

    #[error("token payload is not a JSON object")]
    InvalidPayload,

    #[error("token payload has no subject claim")]
    MissingSubject,

    #[error("token payload has no team claim")]
    MissingTeam,
}

/// Decode `token` into a claims record without checking its signature.
pub fn extract_claims(token: &str) -> Result<ClaimsRecord, DecodeFailure> {
    let mut segments = token.split('.');
    let (header, payload) = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(_signature), None) => (header, payload),
        _ => return Err(DecodeFailure::Malformed),
    };

    let header = decode_segment(header)?;
    if !serde_json::from_slice::<Value>(&header).is_ok_and(|v| v.is_object()) {
        return Err(DecodeFailure::Malformed);
    }

    let payload = decode_segment(payload)?;
    let claims: Map<String, Value> = match serde_json::from_slice(&payload) {
        Ok(Value::Object(map)) => map,
        _ => return Err(DecodeFailure::InvalidPayload),
    };

    let user_id = match claims.get("sub") {
        Some(Value::String(sub)) if !sub.is_empty() => sub.clone(),
        Some(Value::Number(sub)) if sub.as_f64() != Some(0.0) => sub.to_string(),
        _ => return Err(DecodeFailure::MissingSubject),
    };

    let team = match claims.get("team") {
        Some(team) if is_truthy(team) => team,
        _ => return Err(DecodeFailure::MissingTeam),
    };

    Ok(ClaimsRecord {
        user_id,
        team_id: string_field(team, "id"),
        team_name: string_field(team, "name"),
        issued_at: claims.get("iat").and_then(Value::as_i64),
        expires_at: claims.get("exp").and_then(Value::as_i64),
    })
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, DecodeFailure> {
    if segment.is_empty() {
        return Err(DecodeFailure::Malformed);
    }
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| DecodeFailure::Malformed)
}

/// `null`, `false`, `0` and `""` count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
