//! Identity and authorization subsystem.
//!
//! # Data Flow
//! ```text
//! GET /auth/callback?canva_user_token=…
//!     → verify.rs (phase 1: signature strategy)
//!     → claims.rs (phase 2: structural decode → ClaimsRecord)
//!
//! GET /auth/authorize?code_challenge=…&state=…
//!     → authorize.rs (AuthorizationParams → provider URL)
//! ```
//!
//! # Design Decisions
//! - Structural decoding never implies trust; the verifier decides that
//! - The default verifier accepts unsigned tokens and must be replaced before
//!   production use
//! - URL building is pure and never touches configuration directly

pub mod authorize;
pub mod claims;
pub mod verify;

use std::sync::Arc;

use thiserror::Error;

pub use authorize::{build_auth_url, AuthorizationParams, Pkce, DEFAULT_CHALLENGE_METHOD};
pub use claims::{extract_claims, ClaimsRecord, DecodeFailure};
pub use verify::{verifier_from_config, JwtKeyVerifier, SignatureVerifier, Unverified, VerificationError};

/// Either phase of token inspection failed.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Decode(#[from] DecodeFailure),
}

/// Runs signature verification followed by claims extraction.
#[derive(Debug, Clone)]
pub struct TokenInspector {
    verifier: Arc<dyn SignatureVerifier>,
}

impl TokenInspector {
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { verifier }
    }

    /// Inspector that trusts token structure alone.
    pub fn unverified() -> Self {
        Self::new(Arc::new(Unverified))
    }

    /// Whether claims returned by [`inspect`](Self::inspect) are backed by a signature check.
    pub fn is_enforcing(&self) -> bool {
        self.verifier.is_enforcing()
    }

    pub fn inspect(&self, token: &str) -> Result<ClaimsRecord, TokenError> {
        self.verifier.verify(token)?;
        Ok(extract_claims(token)?)
    }
}
