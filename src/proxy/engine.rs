//! Single-attempt, byte-preserving forwarder.
//!
//! # Responsibilities
//! - Build the outbound request (destination URL, sanitized headers, body)
//! - Send it once to the origin
//! - Return whatever the origin answered, whatever the status
//!
//! # Design Decisions
//! - No retries, no status remapping
//! - Redirects from the origin are returned to the caller, not followed
//! - No default timeout; `backend.timeout_secs` opts in
//! - Bodies are relayed still encoded, except for targets marked `decode`,
//!   which go through a client that negotiates gzip/brotli/deflate itself
//! - Dropping the returned future cancels the outbound call

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::BackendConfig;
use crate::proxy::types::{ForwardTarget, InboundRequest, OriginResponse, OutboundRequest};

/// Transport-level failure talking to the origin.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream responded {status} but the body could not be read: {source}")]
    Body {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    /// Status to relay: the origin's own if it got that far, else 502.
    pub fn relay_status(&self) -> StatusCode {
        match self {
            UpstreamError::Transport(_) => StatusCode::BAD_GATEWAY,
            UpstreamError::Body { status, .. } => *status,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            UpstreamError::Transport(e) | UpstreamError::Body { source: e, .. } => e.is_timeout(),
        }
    }
}

/// Forwards requests to the configured origin.
#[derive(Debug, Clone)]
pub struct ForwardingEngine {
    /// Never touches content encoding.
    client: reqwest::Client,
    /// Sends its own `accept-encoding` and decompresses the response.
    decoding: reqwest::Client,
    /// Origin base URL with any trailing `/` removed.
    base: String,
}

impl ForwardingEngine {
    /// Build an engine for `base_url` using the timeouts in `config`.
    pub fn new(base_url: &str, config: &BackendConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: client_builder(config).no_gzip().no_brotli().no_deflate().build()?,
            decoding: client_builder(config).gzip(true).brotli(true).deflate(true).build()?,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Origin base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Absolute origin URL for `path` and an optional raw query.
    pub fn origin_url(&self, path: &str, query: Option<&str>) -> String {
        match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}{}?{}", self.base, path, query),
            None => format!("{}{}", self.base, path),
        }
    }

    /// Forward `inbound` according to `target` and collect the origin's answer.
    pub async fn forward(
        &self,
        inbound: &InboundRequest,
        target: &ForwardTarget,
    ) -> Result<OriginResponse, UpstreamError> {
        let outbound = OutboundRequest::build(&self.base, inbound, target);
        self.send(outbound).await
    }

    async fn send(&self, outbound: OutboundRequest) -> Result<OriginResponse, UpstreamError> {
        tracing::debug!(
            method = %outbound.method,
            upstream = %outbound.url,
            body_len = outbound.body.as_ref().map_or(0, |b| b.len()),
            decode = outbound.decode,
            "Forwarding to origin"
        );

        let client = if outbound.decode { &self.decoding } else { &self.client };
        let mut request = client
            .request(outbound.method, &outbound.url)
            .headers(outbound.headers);
        if let Some(body) = outbound.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(UpstreamError::Transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Body { status, source })?;

        tracing::debug!(status = %status, body_len = body.len(), "Origin responded");

        Ok(OriginResponse { status, headers, body })
    }
}

fn client_builder(config: &BackendConfig) -> reqwest::ClientBuilder {
    let mut builder = reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none());
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
}
