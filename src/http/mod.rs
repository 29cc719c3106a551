//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id + trace layers)
//!     → routing (ordered route table)
//!     → auth.rs (callback / authorize / oauth2 redirect)
//!       or proxy engine (forward to origin)
//!     → response.rs (relay status, headers, body)
//!     → Send to client
//! ```

pub mod auth;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
