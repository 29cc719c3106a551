//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, overlay the process
/// environment, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// File plus environment overlay, without semantic validation.
///
/// Used by tooling that only needs part of the configuration.
pub fn read_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so callers (and tests) can supply any
/// source. Empty values are treated as unset.
pub fn apply_env<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.listener.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Env { var: "PORT", value: port.clone() })?;
    }
    if let Some(url) = get("BACKEND_BASE_URL") {
        config.backend.base_url = Some(url);
    }
    if let Some(id) = get("CANVA_CLIENT_ID") {
        config.canva.client_id = Some(id);
    }
    if let Some(secret) = get("CANVA_CLIENT_SECRET") {
        config.canva.client_secret = Some(secret);
    }
    if let Some(uri) = get("CANVA_REDIRECT_URI") {
        config.canva.redirect_uri = Some(uri);
    }

    Ok(())
}
