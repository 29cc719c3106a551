//! Canva proxy
//!
//! A transparent reverse proxy in front of a Canva app origin, built with
//! Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ routing ──┬──▶ auth handlers (callback, authorize, redirect)
//!                    (request id,               │
//!                     tracing)                  └──▶ forwarding engine ──▶ Origin
//!                                                          │
//!     Client Response ◀── response relay ◀─────────────────┘
//!
//!     Cross-cutting: config, observability, security, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;

use canva_proxy::config::load_config;
use canva_proxy::lifecycle::{self, Shutdown};
use canva_proxy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "canva-proxy", version, about = "Transparent OAuth/webhook proxy for a Canva app origin")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration errors are fatal before anything binds.
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        backend = config.backend.base_url.as_deref().unwrap_or_default(),
        "canva-proxy starting"
    );

    let shutdown = Shutdown::new();
    lifecycle::spawn_signal_handler(shutdown.clone());
    lifecycle::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
