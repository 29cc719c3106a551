//! Provider authorization URL construction.

use url::Url;

use crate::config::CanvaConfig;

/// PKCE method used when a challenge arrives without one.
pub const DEFAULT_CHALLENGE_METHOD: &str = "S256";

/// PKCE challenge and its method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
    pub challenge: String,
    pub method: String,
}

impl Pkce {
    /// Pair a challenge with `method`, falling back to [`DEFAULT_CHALLENGE_METHOD`].
    pub fn new(challenge: impl Into<String>, method: Option<String>) -> Self {
        Self {
            challenge: challenge.into(),
            method: method
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_CHALLENGE_METHOD.to_string()),
        }
    }
}

/// Everything the provider needs to start an authorization-code flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationParams {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub pkce: Option<Pkce>,
    pub state: Option<String>,
}

impl AuthorizationParams {
    /// Credentials from configuration, or `None` unless client id, client
    /// secret and redirect URI are all set.
    pub fn from_config(config: &CanvaConfig) -> Option<Self> {
        Some(Self {
            client_id: config.client_id.clone()?,
            client_secret: config.client_secret.clone()?,
            redirect_uri: config.redirect_uri.clone()?,
            pkce: None,
            state: None,
        })
    }

    pub fn with_pkce(mut self, pkce: Option<Pkce>) -> Self {
        self.pkce = pkce;
        self
    }

    pub fn with_state(mut self, state: Option<String>) -> Self {
        self.state = state;
        self
    }
}

/// Compose the provider authorization URL.
///
/// Query pairs already present on `base` are kept unless they share a key
/// with a parameter set here.
pub fn build_auth_url(base: &Url, params: &AuthorizationParams, scope: &str) -> Url {
    let mut pairs: Vec<(&str, &str)> = vec![
        ("client_id", params.client_id.as_str()),
        ("redirect_uri", params.redirect_uri.as_str()),
        ("client_secret", params.client_secret.as_str()),
        ("response_type", "code"),
        ("scope", scope),
    ];
    if let Some(pkce) = &params.pkce {
        pairs.push(("code_challenge", pkce.challenge.as_str()));
        pairs.push(("code_challenge_method", pkce.method.as_str()));
    }
    if let Some(state) = &params.state {
        pairs.push(("state", state.as_str()));
    }

    let existing: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| !pairs.iter().any(|(key, _)| *key == &**k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in &existing {
            query.append_pair(k, v);
        }
        for &(k, v) in &pairs {
            query.append_pair(k, v);
        }
    }
    url
}
