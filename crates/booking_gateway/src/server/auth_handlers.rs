//! Authentication handlers
//!
//! Login and registration relay to upstream like any other call, then move
//! the issued credential into the browser's cookie jar. Logout, session and
//! guard never touch upstream.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::{json_response, relay_response, AppState};
use crate::auth::{extract_credential, guard, Credential, RegistrationRequest, TokenStore};
use crate::error::{GatewayError, Result};
use crate::upstream::{UpstreamRequest, UpstreamResponse};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Gateway-only login field, never sent upstream
const REMEMBER_FIELD: &str = "remember";

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let (remember, body) = split_login_body(body);

    let request = UpstreamRequest::new(Method::POST, vec!["auth", "login"]).body(Some(body));
    let upstream = state.upstream.send(request).await.map_err(|e| {
        warn!("[WARN] Login relay failed: {}", e);
        GatewayError::Transport {
            message: LOGIN_FAILED,
            details: e.to_string(),
        }
    })?;

    let mut store = TokenStore::from_headers(&headers, state.cookies);

    if !upstream.is_success() {
        warn!("[WARN] Upstream rejected login with {}", upstream.status);
        let message = upstream
            .message()
            .unwrap_or_else(|| LOGIN_FAILED.to_string());
        return Ok(json_response(upstream.status, json!({ "message": message }), &store));
    }

    let ttl = state.ttl.ttl(remember);
    match issued_credential(&upstream) {
        Some(credential) => {
            store.set(&credential, ttl);
            info!(
                "[OK] Login succeeded; credential stored for {}h (remember={})",
                ttl.as_secs() / 3600,
                remember
            );
        }
        None => warn!("[WARN] Upstream login answered {} without accessToken", upstream.status),
    }

    Ok(relay_response(&upstream, &store))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let form: RegistrationRequest =
        serde_json::from_slice(&body).map_err(GatewayError::InvalidBody)?;

    if let Err(errors) = form.validate() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "Validation failed",
                "errors": errors,
            })),
        )
            .into_response());
    }

    let request = UpstreamRequest::new(Method::POST, vec!["auth", "register"]).body(Some(body));
    let upstream = state.upstream.send(request).await.map_err(|e| {
        warn!("[WARN] Registration relay failed: {}", e);
        GatewayError::Transport {
            message: REGISTRATION_FAILED,
            details: e.to_string(),
        }
    })?;

    let mut store = TokenStore::from_headers(&headers, state.cookies);

    if upstream.is_success() {
        if let Some(credential) = issued_credential(&upstream) {
            store.set(&credential, state.ttl.session);
            info!("[OK] Registration succeeded; credential stored");
        }
    } else {
        warn!("[WARN] Upstream rejected registration with {}", upstream.status);
    }

    Ok(relay_response(&upstream, &store))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let mut store = TokenStore::from_headers(&headers, state.cookies);
    store.clear();
    info!("[INFO] Credential cleared on logout");
    json_response(StatusCode::OK, json!({ "message": "Logged out" }), &store)
}

/// GET /api/auth/session
pub async fn session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<Value> {
    let store = TokenStore::from_headers(&headers, state.cookies);
    let authenticated = extract_credential(&headers, &store).is_some();
    Json(json!({ "authenticated": authenticated }))
}

#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    #[serde(default = "default_guard_path")]
    pub path: String,
}

fn default_guard_path() -> String {
    guard::HOME_PATH.to_string()
}

/// GET /api/auth/guard?path=
pub async fn navigation_guard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GuardQuery>,
    headers: HeaderMap,
) -> Json<guard::GuardDecision> {
    let store = TokenStore::from_headers(&headers, state.cookies);
    let authenticated = extract_credential(&headers, &store).is_some();
    Json(guard::evaluate(&query.path, authenticated))
}

/// Take the `remember` flag out of a login form
///
/// Only a JSON object carrying the flag is rewritten; any other body goes
/// upstream byte-for-byte and upstream decides what to make of it.
fn split_login_body(body: Bytes) -> (bool, Bytes) {
    let Ok(mut form) = serde_json::from_slice::<Map<String, Value>>(&body) else {
        return (false, body);
    };
    let Some(flag) = form.shift_remove(REMEMBER_FIELD) else {
        return (false, body);
    };

    let remember = flag.as_bool().unwrap_or(false);
    match serde_json::to_vec(&form) {
        Ok(stripped) => (remember, Bytes::from(stripped)),
        Err(_) => (remember, body),
    }
}

/// Token and session cookie from a successful login/registration answer
fn issued_credential(upstream: &UpstreamResponse) -> Option<Credential> {
    let body = upstream.json()?;
    let token = body
        .get("accessToken")?
        .as_str()
        .filter(|token| !token.is_empty())?;

    Some(Credential::new(token).with_session_cookie(upstream.session_cookie()))
}
