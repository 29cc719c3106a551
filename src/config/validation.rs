//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required values (backend base URL)
//! - Validate value ranges (port, body size) and URL shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - OAuth app credentials are optional here; only `/auth/authorize` needs
//!   them, and it reports their absence itself

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyConfig, TokenVerificationConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("BACKEND_BASE_URL is not set")]
    MissingBackend,

    #[error("backend base URL {0:?} is not an absolute http(s) URL")]
    InvalidBackend(String),

    #[error("listener port must be non-zero")]
    InvalidPort,

    #[error("authorize URL {0:?} is not a valid URL")]
    InvalidAuthorizeUrl(String),

    #[error("max_body_size must be greater than zero")]
    InvalidBodyLimit,

    #[error("unknown log format {0:?} (expected \"pretty\" or \"json\")")]
    InvalidLogFormat(String),

    #[error("token verification {0} must not be empty")]
    EmptyVerificationMaterial(&'static str),
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.backend.base_url.as_deref() {
        None => errors.push(ValidationError::MissingBackend),
        Some(raw) => {
            if !is_http_url(raw) {
                errors.push(ValidationError::InvalidBackend(raw.to_string()));
            }
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if Url::parse(&config.canva.authorize_url).is_err() {
        errors.push(ValidationError::InvalidAuthorizeUrl(
            config.canva.authorize_url.clone(),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::InvalidBodyLimit);
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::InvalidLogFormat(other.to_string())),
    }

    match &config.token_verification {
        TokenVerificationConfig::Unverified => {}
        TokenVerificationConfig::Hmac { secret } if secret.is_empty() => {
            errors.push(ValidationError::EmptyVerificationMaterial("secret"));
        }
        TokenVerificationConfig::RsaPem { key_path } if key_path.as_os_str().is_empty() => {
            errors.push(ValidationError::EmptyVerificationMaterial("key_path"));
        }
        _ => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.backend.base_url = Some("http://127.0.0.1:9000".into());
        config
    }

    #[test]
    fn test_valid_minimal() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_missing_backend() {
        let errors = validate_config(&ProxyConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingBackend]);
    }

    #[test]
    fn test_non_http_backend() {
        let mut config = valid();
        config.backend.base_url = Some("ftp://origin".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidBackend(_)));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.listener.port = 0;
        config.security.max_body_size = 0;
        config.observability.log_format = "xml".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingBackend,
                ValidationError::InvalidPort,
                ValidationError::InvalidBodyLimit,
                ValidationError::InvalidLogFormat("xml".into()),
            ]
        );
    }

    #[test]
    fn test_partial_oauth_credentials_accepted() {
        let mut config = valid();
        config.canva.client_id = Some("id".into());
        assert_eq!(validate_config(&config), Ok(()));

        config.canva.client_id = None;
        config.canva.redirect_uri = Some("https://app/cb".into());
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_empty_hmac_secret() {
        let mut config = valid();
        config.token_verification = TokenVerificationConfig::Hmac { secret: String::new() };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyVerificationMaterial("secret")]);
    }
}
