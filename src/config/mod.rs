//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overlay: PORT, BACKEND_BASE_URL, CANVA_*)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Components receive config values explicitly and never read the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env, load_config, read_config, ConfigError};
pub use schema::{
    BackendConfig, CanvaConfig, ListenerConfig, ObservabilityConfig, ProxyConfig,
    ProxySettings, SecurityConfig, TokenVerificationConfig,
};
pub use validation::{validate_config, ValidationError};
