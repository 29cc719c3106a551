//! Startup orchestration.
//!
//! # Responsibilities
//! - Build request-time state from the validated configuration
//! - Start the optional metrics endpoint
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and happens before the bind
//! - Listeners start last (traffic only when ready)

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metrics address {0}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Build, bind and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let address = config.listener.bind_address();
    let observability = config.observability.clone();
    let server = HttpServer::new(config)?;

    if !server.state().tokens.is_enforcing() {
        tracing::warn!(
            "User tokens are decoded without signature verification; \
             configure [token_verification] before production use"
        );
    }

    if observability.metrics_enabled {
        let addr = observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address: address.clone(), source })?;

    tracing::info!(address = %address, "Listening for connections");
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
