//! Request/response values passed through the forwarding engine.

use axum::body::Bytes;
use axum::http::{header, request::Parts, HeaderMap, Method, StatusCode};

use crate::security::sanitize_request_headers;

/// A fully buffered request as received from the caller.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    /// Raw query string without the leading `?`, exactly as received.
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers.clone(),
            body,
        }
    }

    /// Look up a decoded query parameter.
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// How the engine treats the inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    /// Send the exact inbound bytes as the outbound body.
    BodyPreserving,
    /// Send no body; the query string carries the payload.
    QueryPreserving,
}

/// Where and how a matched request is forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardTarget {
    pub mode: ForwardMode,
    /// Destination path on the origin; `None` keeps the inbound path.
    pub path: Option<&'static str>,
    pub preserve_query: bool,
    /// Let the client negotiate and undo content encoding, so the body can be
    /// parsed. The caller's `accept-encoding` is not forwarded.
    pub decode: bool,
}

impl ForwardTarget {
    /// Same path, same query, body passed through.
    pub const fn passthrough_body() -> Self {
        Self {
            mode: ForwardMode::BodyPreserving,
            path: None,
            preserve_query: true,
            decode: false,
        }
    }

    /// Same path, same query, no body.
    pub const fn passthrough_query() -> Self {
        Self {
            mode: ForwardMode::QueryPreserving,
            path: None,
            preserve_query: true,
            decode: false,
        }
    }

    /// The same target, with the response body decoded.
    pub const fn decoded(self) -> Self {
        Self { decode: true, ..self }
    }
}

/// The request actually sent to the origin.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub decode: bool,
}

impl OutboundRequest {
    /// Derive the outbound request for `inbound` against `base` (no trailing slash).
    pub fn build(base: &str, inbound: &InboundRequest, target: &ForwardTarget) -> Self {
        let path = target.path.unwrap_or(inbound.path.as_str());
        let mut url = format!("{base}{path}");
        if target.preserve_query {
            if let Some(query) = inbound.query.as_deref().filter(|q| !q.is_empty()) {
                url.push('?');
                url.push_str(query);
            }
        }

        let body = match target.mode {
            ForwardMode::BodyPreserving => Some(inbound.body.clone()),
            ForwardMode::QueryPreserving => None,
        };

        let mut headers = sanitize_request_headers(&inbound.headers);
        if target.decode {
            headers.remove(header::ACCEPT_ENCODING);
        }

        Self {
            method: inbound.method.clone(),
            url,
            headers,
            body,
            decode: target.decode,
        }
    }
}

/// What the origin answered.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}
