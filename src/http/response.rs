//! Response relay.
//!
//! # Responsibilities
//! - Turn an origin response into the caller's response
//! - Narrow wildcard GET responses to the origin's `content` field
//! - Map transport failures to 502 (or the status the origin already sent)
//!
//! # Design Decisions
//! - Status codes are never remapped
//! - Body bytes are relayed as received; hop-by-hop headers are dropped
//! - Content extraction never fails: anything unexpected becomes an empty body

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::proxy::{OriginResponse, UpstreamError};
use crate::routing::RelayMode;
use crate::security::strip_response_hop_by_hop;

/// Body sent when the origin could not be reached.
pub const UPSTREAM_ERROR_BODY: &str = "Upstream error";

/// Relay `origin` according to `mode`.
pub fn relay(origin: OriginResponse, mode: RelayMode) -> Response {
    match mode {
        RelayMode::Full => relay_full(origin),
        RelayMode::ContentField => relay_content_field(origin),
    }
}

fn relay_full(origin: OriginResponse) -> Response {
    let mut response = Response::new(Body::from(origin.body));
    *response.status_mut() = origin.status;
    *response.headers_mut() = strip_response_hop_by_hop(&origin.headers);
    response
}

fn relay_content_field(origin: OriginResponse) -> Response {
    let (content_type, body) = match extract_content(&origin.body) {
        Some(Value::String(text)) => ("text/html; charset=utf-8", Bytes::from(text)),
        Some(other) => ("application/json", Bytes::from(other.to_string())),
        None => return origin.status.into_response(),
    };

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = origin.status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// The `content` field of a JSON object body, unless it is missing or null.
pub fn extract_content(body: &[u8]) -> Option<Value> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(mut map)) => map.remove("content").filter(|v| !v.is_null()),
        _ => None,
    }
}

/// Response for a failed forward.
pub fn upstream_failure(err: &UpstreamError) -> Response {
    (err.relay_status(), UPSTREAM_ERROR_BODY).into_response()
}

/// `{"error": message}` with `status`.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

/// 302 redirect to `location`.
pub fn found(location: &str) -> Response {
    match HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location = %location, "Redirect target is not a valid header value");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    fn origin(status: u16, body: &'static [u8]) -> OriginResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("x-origin", HeaderValue::from_static("1"));
        OriginResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers,
            body: Bytes::from_static(body),
        }
    }

    async fn body(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn test_full_relay_keeps_status_headers_body() {
        let response = relay(origin(418, b"\x01\x02teapot"), RelayMode::Full);
        assert_eq!(response.status().as_u16(), 418);
        assert_eq!(response.headers()["x-origin"], "1");
        assert!(response.headers().get(header::CONNECTION).is_none());
        assert_eq!(&body(response).await[..], b"\x01\x02teapot");
    }

    #[tokio::test]
    async fn test_content_field_string() {
        let response = relay(origin(200, br#"{"content":"challenge-123","other":1}"#), RelayMode::ContentField);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-origin").is_none());
        assert_eq!(&body(response).await[..], b"challenge-123");
    }

    #[tokio::test]
    async fn test_content_field_object() {
        let response = relay(origin(201, br#"{"content":{"ok":true}}"#), RelayMode::ContentField);
        assert_eq!(response.status().as_u16(), 201);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(&body(response).await[..], br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_content_field_missing_defaults_to_empty() {
        let bodies: [&[u8]; 4] = [b"not json", br#"{"error":"nope"}"#, br#"{"content":null}"#, b"[1]"];
        for raw in bodies {
            let response = relay(
                OriginResponse {
                    status: StatusCode::FORBIDDEN,
                    headers: HeaderMap::new(),
                    body: Bytes::copy_from_slice(raw),
                },
                RelayMode::ContentField,
            );
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert!(body(response).await.is_empty());
        }
    }

    #[test]
    fn test_found_sets_location() {
        let response = found("https://example.com/a?b=c");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/a?b=c");
    }

    fn client_error() -> reqwest::Error {
        reqwest::Client::new().get("not a url").build().unwrap_err()
    }

    #[tokio::test]
    async fn test_body_failure_relays_origin_status() {
        let err = UpstreamError::Body {
            status: StatusCode::SERVICE_UNAVAILABLE,
            source: client_error(),
        };
        assert_eq!(err.relay_status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = upstream_failure(&err);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(&body(response).await[..], UPSTREAM_ERROR_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_transport_failure_is_bad_gateway() {
        let response = upstream_failure(&UpstreamError::Transport(client_error()));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(&body(response).await[..], UPSTREAM_ERROR_BODY.as_bytes());
    }
}
