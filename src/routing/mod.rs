//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched Route (name + RouteAction) or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins: exact method+path rules, then POST *, then GET *

pub mod matcher;
pub mod router;

pub use router::{RelayMode, Route, RouteAction, Router};
