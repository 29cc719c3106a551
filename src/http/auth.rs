//! Provider-facing OAuth endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::{build_auth_url, AuthorizationParams, ClaimsRecord, Pkce};
use crate::http::response::{found, json_error};
use crate::http::server::AppState;
use crate::proxy::InboundRequest;

#[derive(Debug, Serialize)]
struct CallbackResponse<'a> {
    success: bool,
    message: &'static str,
    user: &'a ClaimsRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

/// `GET /auth/callback`: decode the provider's user token.
pub fn callback(state: &AppState, inbound: &InboundRequest) -> Response {
    let Some(token) = inbound.query_param("canva_user_token").filter(|t| !t.is_empty()) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing canva_user_token");
    };
    let nonce = inbound.query_param("nonce");
    let oauth_state = inbound.query_param("state");

    let user = match state.tokens.inspect(&token) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected user token");
            return json_error(StatusCode::UNAUTHORIZED, "Invalid or expired token");
        }
    };

    tracing::info!(
        user_id = %user.user_id,
        team_id = user.team_id.as_deref().unwrap_or("-"),
        team_name = user.team_name.as_deref().unwrap_or("-"),
        nonce = nonce.as_deref().unwrap_or("-"),
        state = oauth_state.as_deref().unwrap_or("-"),
        verified = state.tokens.is_enforcing(),
        "User authenticated"
    );

    Json(CallbackResponse {
        success: true,
        message: "Authentication successful",
        user: &user,
        nonce,
        state: oauth_state,
    })
    .into_response()
}

/// `GET /auth/authorize`: redirect to the provider's authorization page.
pub fn authorize(state: &AppState, inbound: &InboundRequest) -> Response {
    let canva = &state.config.canva;
    let Some(params) = AuthorizationParams::from_config(canva) else {
        tracing::error!(
            client_id = canva.client_id.is_some(),
            client_secret = canva.client_secret.is_some(),
            redirect_uri = canva.redirect_uri.is_some(),
            "Authorize requested but the Canva app credentials are incomplete"
        );
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Canva app not configured");
    };

    let pkce = inbound
        .query_param("code_challenge")
        .filter(|c| !c.is_empty())
        .map(|challenge| Pkce::new(challenge, inbound.query_param("code_challenge_method")));
    let params = params
        .with_pkce(pkce)
        .with_state(inbound.query_param("state").filter(|s| !s.is_empty()));

    let url = build_auth_url(&state.authorize_base, &params, &canva.scope);
    tracing::debug!(pkce = params.pkce.is_some(), "Redirecting to provider authorization");
    found(url.as_str())
}

/// `GET /api/oauth2/authorize`: send the browser to the origin's own endpoint.
pub fn oauth2_redirect(state: &AppState, inbound: &InboundRequest) -> Response {
    let target = state.engine.origin_url("/api/oauth2/authorize", inbound.query.as_deref());
    tracing::info!(target = %target, "Redirecting OAuth2 authorize to origin");
    found(&target)
}
