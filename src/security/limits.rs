//! Request size limits.
//!
//! # Responsibilities
//! - Buffer the inbound body up to the configured maximum
//! - Distinguish "too large" from other body read failures
//!
//! # Design Decisions
//! - The whole body is buffered so it can be forwarded byte-for-byte
//! - Oversized bodies are rejected with 413 before any upstream call

use axum::body::{Body, Bytes};
use http_body_util::LengthLimitError;
use thiserror::Error;

/// Failure while reading the inbound body.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Body(axum::Error),
}

/// Read the complete body, failing if it exceeds `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, RequestError> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        if is_length_limit(&e) {
            RequestError::BodyTooLarge { limit }
        } else {
            RequestError::Body(e)
        }
    })
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_within_limit() {
        let bytes = read_body(Body::from(vec![0u8, 1, 2, 255]), 16).await.unwrap();
        assert_eq!(&bytes[..], &[0u8, 1, 2, 255]);
    }

    #[tokio::test]
    async fn test_rejects_over_limit() {
        let err = read_body(Body::from(vec![7u8; 32]), 8).await.unwrap_err();
        assert!(matches!(err, RequestError::BodyTooLarge { limit: 8 }));
    }

    #[tokio::test]
    async fn test_empty_body() {
        let bytes = read_body(Body::empty(), 8).await.unwrap();
        assert!(bytes.is_empty());
    }
}
