//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (buffer body up to max_body_size)
//!     → headers.rs (drop content-length / transfer-encoding / host)
//!     → Forwarding engine
//!
//! Origin response:
//!     → headers.rs (strip hop-by-hop) → caller
//! ```
//!
//! # Design Decisions
//! - Sanitization is minimal: credentials and cookies are the origin's business
//! - Pure functions, no shared state

pub mod headers;
pub mod limits;

pub use headers::{sanitize_request_headers, strip_response_hop_by_hop};
pub use limits::{read_body, RequestError};
