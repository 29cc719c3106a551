//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Choose pretty (development) or JSON (production) output
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured default filter
//! - Initialization is fallible so tests and embedders can call it twice

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = config.log_format == "json";

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .try_init()
}
