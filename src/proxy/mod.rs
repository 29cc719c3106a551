//! Forwarding engine subsystem.
//!
//! # Data Flow
//! ```text
//! axum Request
//!     → InboundRequest (method, path, raw query, headers, body bytes)
//!     → OutboundRequest (destination URL, sanitized headers, body per ForwardMode)
//!     → engine.rs (single reqwest call)
//!     → OriginResponse (status, headers, body bytes) | UpstreamError
//! ```
//!
//! # Design Decisions
//! - One forwarding path for every proxied route, parameterized by ForwardTarget
//! - Body bytes are never re-encoded
//! - Stateless per request; the shared client is the only shared value

pub mod engine;
pub mod types;

pub use engine::{ForwardingEngine, UpstreamError};
pub use types::{ForwardMode, ForwardTarget, InboundRequest, OriginResponse, OutboundRequest};
