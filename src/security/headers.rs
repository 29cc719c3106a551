//! Header sanitization for forwarded traffic.
//!
//! # Responsibilities
//! - Drop framing/destination headers the HTTP client recomputes
//!   (`content-length`, `transfer-encoding`, `host`) before forwarding
//! - Strip hop-by-hop headers from origin responses before relaying
//!
//! # Design Decisions
//! - Everything else passes through untouched, including `authorization`
//!   and `cookie`
//! - Repeated headers keep every value, in order
//! - `HeaderName` is always lowercase, so comparisons are case-insensitive

use axum::http::header::{self, HeaderMap, HeaderName};

/// Request headers the outbound client must compute itself.
pub const RECOMPUTED_REQUEST_HEADERS: &[HeaderName] = &[
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::HOST,
];

/// Response headers that only describe the origin leg of the exchange.
const HOP_BY_HOP_RESPONSE_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "content-length",
];

/// Produce the header set to send to the origin.
pub fn sanitize_request_headers(headers: &HeaderMap) -> HeaderMap {
    filter(headers, |name| RECOMPUTED_REQUEST_HEADERS.contains(name))
}

/// Produce the header set to relay back to the caller.
pub fn strip_response_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    filter(headers, |name| HOP_BY_HOP_RESPONSE_HEADERS.contains(&name.as_str()))
}

fn filter(headers: &HeaderMap, drop: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !drop(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_removes_recomputed_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Length", HeaderValue::from_static("12"));
        headers.insert("Transfer-Encoding", HeaderValue::from_static("chunked"));
        headers.insert("HOST", HeaderValue::from_static("proxy.local:3000"));
        headers.insert("content-type", HeaderValue::from_static("application/octet-stream"));

        let out = sanitize_request_headers(&headers);
        assert_eq!(out.len(), 1);
        assert_eq!(out["content-type"], "application/octet-stream");
    }

    #[test]
    fn test_keeps_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=1"));
        headers.insert("x-canva-signature", HeaderValue::from_static("sig"));

        let out = sanitize_request_headers(&headers);
        assert_eq!(out, headers);
    }

    #[test]
    fn test_keeps_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));

        let out = sanitize_request_headers(&headers);
        let values: Vec<_> = out.get_all("x-forwarded-for").iter().collect();
        assert_eq!(values, vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_response_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("5"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(header::SET_COOKIE, HeaderValue::from_static("a=b"));

        let out = strip_response_hop_by_hop(&headers);
        assert!(out.get(header::CONNECTION).is_none());
        assert!(out.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(out[header::CONTENT_TYPE], "text/plain");
        assert_eq!(out[header::CONTENT_ENCODING], "gzip");
        assert_eq!(out[header::SET_COOKIE], "a=b");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn header_name() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("content-length".to_string()),
                Just("transfer-encoding".to_string()),
                Just("host".to_string()),
                Just("authorization".to_string()),
                "x-[a-z]{1,8}",
            ]
        }

        proptest! {
            #[test]
            fn sanitized_headers_are_the_input_minus_recomputed(
                entries in prop::collection::vec((header_name(), "[a-zA-Z0-9 ]{0,16}"), 0..16)
            ) {
                let mut headers = HeaderMap::new();
                for (name, value) in &entries {
                    headers.append(
                        HeaderName::from_bytes(name.as_bytes()).unwrap(),
                        HeaderValue::from_str(value).unwrap(),
                    );
                }

                let out = sanitize_request_headers(&headers);
                for name in RECOMPUTED_REQUEST_HEADERS {
                    prop_assert!(out.get(name).is_none());
                }
                for (name, _) in headers.iter().filter(|(n, _)| !RECOMPUTED_REQUEST_HEADERS.contains(*n)) {
                    let expected: Vec<_> = headers.get_all(name).iter().collect();
                    let actual: Vec<_> = out.get_all(name).iter().collect();
                    prop_assert_eq!(expected, actual);
                }
            }
        }
    }
}
