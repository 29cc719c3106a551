//! Transparent OAuth and webhook proxy for a Canva app origin.

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;
pub mod routing;

// Identity
pub mod auth;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
