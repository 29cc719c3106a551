//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default provider authorization endpoint.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://www.canva.com/api/oauth/authorize";

/// Default scope requested from the provider.
pub const DEFAULT_SCOPE: &str = "design:read design:write";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// The single origin every request is relayed to.
    pub backend: BackendConfig,

    /// Third-party app credentials used by the authorize redirect.
    pub canva: CanvaConfig,

    /// Forwarding behaviour switches.
    pub proxy: ProxySettings,

    /// Request limits.
    pub security: SecurityConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// How identity token signatures are checked.
    pub token_verification: TokenVerificationConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port (`PORT`).
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Backend origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the origin (`BACKEND_BASE_URL`). Required.
    pub base_url: Option<String>,

    /// Optional connect timeout for outbound calls, in seconds.
    pub connect_timeout_secs: Option<u64>,

    /// Optional total timeout for outbound calls, in seconds.
    /// Unset means the origin may stall a request indefinitely.
    pub timeout_secs: Option<u64>,
}

/// Provider app credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CanvaConfig {
    /// `CANVA_CLIENT_ID`.
    pub client_id: Option<String>,

    /// `CANVA_CLIENT_SECRET`.
    pub client_secret: Option<String>,

    /// `CANVA_REDIRECT_URI`.
    pub redirect_uri: Option<String>,

    /// Provider authorization endpoint.
    pub authorize_url: String,

    /// Space-separated scope string sent with every authorization request.
    pub scope: String,
}

impl Default for CanvaConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

/// Forwarding behaviour switches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Relay only the `content` field of the origin's JSON body for wildcard GETs.
    pub unwrap_content_envelope: bool,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            unwrap_content_envelope: true,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "canva_proxy=info,tower_http=info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Signature verification strategy for identity tokens.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TokenVerificationConfig {
    /// Accept tokens on structure alone. Not safe for production.
    #[default]
    Unverified,

    /// HS256 with a shared secret.
    Hmac { secret: String },

    /// RS256 with a PEM-encoded RSA public key on disk.
    RsaPem { key_path: PathBuf },
}
