//! Signature verification for identity tokens.
//!
//! # Responsibilities
//! - Decide whether a token was issued by a trusted key
//! - Build the configured strategy at startup
//!
//! # Design Decisions
//! - Verification is a separate phase from structural decoding, behind the
//!   [`SignatureVerifier`] trait, so the key source can be swapped
//! - [`Unverified`] exists for development only and is reported as
//!   non-enforcing; startup logs a warning when it is active

use std::fmt;
use std::fs;
use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::config::TokenVerificationConfig;

/// Errors raised while building or running a verifier.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("failed to load verification key: {0}")]
    KeyLoad(#[from] std::io::Error),

    #[error("invalid verification key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Rejected(jsonwebtoken::errors::Error),
}

/// Checks that a token carries a valid signature.
pub trait SignatureVerifier: Send + Sync + fmt::Debug {
    /// Returns `Ok(())` if the token's signature (and any time claims the
    /// strategy checks) are acceptable.
    fn verify(&self, token: &str) -> Result<(), VerificationError>;

    /// False when this strategy accepts tokens without checking anything.
    fn is_enforcing(&self) -> bool {
        true
    }
}

/// Accepts every token. Claims decoded behind this verifier are untrusted.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unverified;

impl SignatureVerifier for Unverified {
    fn verify(&self, _token: &str) -> Result<(), VerificationError> {
        Ok(())
    }

    fn is_enforcing(&self) -> bool {
        false
    }
}

/// Verifies tokens against a single static key.
pub struct JwtKeyVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtKeyVerifier {
    /// HS256 with a shared secret.
    pub fn hmac(secret: &[u8]) -> Self {
        Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256)
    }

    /// RS256 with a PEM-encoded RSA public key.
    pub fn rsa_pem(pem: &[u8]) -> Result<Self, VerificationError> {
        let key = DecodingKey::from_rsa_pem(pem).map_err(VerificationError::InvalidKey)?;
        Ok(Self::with_key(key, Algorithm::RS256))
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        // Claim presence is the extractor's concern; only expiry is checked here.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_aud = false;
        Self { key, validation }
    }
}

impl fmt::Debug for JwtKeyVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeyVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

impl SignatureVerifier for JwtKeyVerifier {
    fn verify(&self, token: &str) -> Result<(), VerificationError> {
        decode::<serde_json::Value>(token, &self.key, &self.validation)
            .map(|_| ())
            .map_err(VerificationError::Rejected)
    }
}

/// Build the verifier described by `config`.
pub fn verifier_from_config(
    config: &TokenVerificationConfig,
) -> Result<Arc<dyn SignatureVerifier>, VerificationError> {
    Ok(match config {
        TokenVerificationConfig::Unverified => Arc::new(Unverified),
        TokenVerificationConfig::Hmac { secret } => Arc::new(JwtKeyVerifier::hmac(secret.as_bytes())),
        TokenVerificationConfig::RsaPem { key_path } => {
            let pem = fs::read(key_path)?;
            Arc::new(JwtKeyVerifier::rsa_pem(&pem)?)
        }
    })
}
