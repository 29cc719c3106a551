//! Request identification.
//!
//! # Responsibilities
//! - Assign a UUID v4 `x-request-id` to requests that arrive without one
//! - Echo the id on the response
//! - Expose the id to handlers and spans
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A client-supplied id is kept, so callers can correlate across hops
//! - The id stays in the request headers and therefore reaches the origin

use axum::http::HeaderMap;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The request id, if present and valid UTF-8.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

/// Layer that generates missing request ids.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use axum::routing::get;
    use axum::Router;
    use tower::{ServiceBuilder, ServiceExt};

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|headers: HeaderMap| async move {
                    request_id(&headers).unwrap_or_default().to_string()
                }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(propagate_request_id_layer()),
            )
    }

    #[tokio::test]
    async fn test_generates_id() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = request_id(response.headers()).unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&id).is_ok());

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body, id.as_bytes());
    }

    #[tokio::test]
    async fn test_keeps_client_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(X_REQUEST_ID, HeaderValue::from_static("client-id-1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(request_id(response.headers()), Some("client-id-1"));
    }
}
