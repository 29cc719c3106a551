//! Per-request spans.
//!
//! Every request gets an `http_request` span carrying its method, path and
//! `x-request-id`, so log lines from the handler and the forwarding engine
//! can be correlated.

use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;

use crate::http::request::request_id;

/// Builds the span for each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id(request.headers()).unwrap_or("-"),
        )
    }
}

/// `TraceLayer` emitting [`RequestSpan`] spans.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http().make_span_with(RequestSpan)
}
