//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all dispatcher
//! - Wire up middleware (request ID, tracing)
//! - Dispatch requests through the route table
//! - Forward requests to the origin and relay the answer
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use url::Url;

use crate::auth::{verifier_from_config, TokenInspector, VerificationError};
use crate::config::ProxyConfig;
use crate::http::auth;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{relay, upstream_failure};
use crate::observability::{metrics, tracing::trace_layer};
use crate::proxy::{ForwardMode, ForwardTarget, ForwardingEngine, InboundRequest};
use crate::routing::{RelayMode, RouteAction, Router as ProxyRouter};
use crate::security::{read_body, RequestError};

/// Errors building or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("backend base URL is not configured")]
    MissingBackend,

    #[error("invalid authorize URL: {0}")]
    AuthorizeUrl(#[from] url::ParseError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Verifier(#[from] VerificationError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub engine: ForwardingEngine,
    pub tokens: TokenInspector,
    pub authorize_base: Arc<Url>,
    pub config: Arc<ProxyConfig>,
}

impl AppState {
    /// Build every request-time component from a validated config.
    pub fn from_config(config: ProxyConfig) -> Result<Self, ServerError> {
        let base_url = config
            .backend
            .base_url
            .as_deref()
            .ok_or(ServerError::MissingBackend)?;
        let engine = ForwardingEngine::new(base_url, &config.backend)?;
        let authorize_base = Url::parse(&config.canva.authorize_url)?;
        let tokens = TokenInspector::new(verifier_from_config(&config.token_verification)?);

        Ok(Self {
            router: Arc::new(ProxyRouter::standard(&config.proxy)),
            engine,
            tokens,
            authorize_base: Arc::new(authorize_base),
            config: Arc::new(config),
        })
    }
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let state = AppState::from_config(config)?;
        Ok(Self::with_state(state))
    }

    /// Create a server around prebuilt state.
    pub fn with_state(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(trace_layer())
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.state.engine.base_url(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.state.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Main handler: match a route, then run its action.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).unwrap_or("unknown").to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let Some(route) = state.router.match_request(&request) else {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start_time);
        return (StatusCode::NOT_FOUND, format!("Cannot {method} {path}")).into_response();
    };
    let (route_name, action) = (route.name, route.action);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route_name,
        "Dispatching request"
    );

    let (parts, body) = request.into_parts();
    let body = match action {
        RouteAction::Forward {
            target: ForwardTarget { mode: ForwardMode::BodyPreserving, .. },
            ..
        } => match read_body(body, state.config.security.max_body_size).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Rejecting request body");
                let status = match e {
                    RequestError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    RequestError::Body(_) => StatusCode::BAD_REQUEST,
                };
                metrics::record_request(method.as_str(), status.as_u16(), route_name, start_time);
                return status.into_response();
            }
        },
        _ => Bytes::new(),
    };
    let inbound = InboundRequest::from_parts(&parts, body);

    let response = match action {
        RouteAction::AuthCallback => auth::callback(&state, &inbound),
        RouteAction::AuthAuthorize => auth::authorize(&state, &inbound),
        RouteAction::OAuthRedirect => auth::oauth2_redirect(&state, &inbound),
        RouteAction::Forward { target, relay: mode } => {
            forward(&state, route_name, &request_id, &inbound, &target, mode).await
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), route_name, start_time);
    response
}

async fn forward(
    state: &AppState,
    route_name: &'static str,
    request_id: &str,
    inbound: &InboundRequest,
    target: &ForwardTarget,
    mode: RelayMode,
) -> Response {
    match state.engine.forward(inbound, target).await {
        Ok(origin) => {
            tracing::debug!(request_id = %request_id, status = %origin.status, "Relaying origin response");
            relay(origin, mode)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                route = route_name,
                timeout = e.is_timeout(),
                error = %e,
                "Upstream error"
            );
            metrics::record_upstream_error(route_name);
            upstream_failure(&e)
        }
    }
}
