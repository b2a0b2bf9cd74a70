//! CRUD relay handlers
//!
//! One handler per HTTP verb, shared by every resource in the table. Each
//! call makes at most one upstream request and relays its status verbatim.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    response::Response,
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{
    relay_response,
    resources::{Resource, Verb},
    AppState,
};
use crate::auth::{extract_credential, TokenStore};
use crate::error::{GatewayError, Result};
use crate::upstream::UpstreamRequest;

pub const PROXY_FAILED: &str = "Proxy request failed";

type IdQueryResult = std::result::Result<Query<IdQuery>, QueryRejection>;

/// `?id=` selector; an empty value counts as absent
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    fn id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// An undecodable query string (e.g. a repeated `id`) is an invalid selector
    fn extract(query: IdQueryResult) -> Result<IdQuery> {
        match query {
            Ok(Query(query)) => Ok(query),
            Err(e) => {
                debug!("Rejecting query string: {}", e);
                Err(GatewayError::InvalidId)
            }
        }
    }
}

/// GET /api/:resource: list, or fetch one record when `?id=` is present
pub async fn list_or_get(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    query: IdQueryResult,
    headers: HeaderMap,
) -> Result<Response> {
    let query = IdQuery::extract(query)?;
    let verb = if query.id().is_some() { Verb::Get } else { Verb::List };
    relay(&state, &resource, verb, query.id(), &headers, None).await
}

/// POST /api/:resource
pub async fn create(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    relay(&state, &resource, Verb::Create, None, &headers, Some(body)).await
}

/// PUT /api/:resource?id=
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    query: IdQueryResult,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let query = IdQuery::extract(query)?;
    relay(&state, &resource, Verb::Update, query.id(), &headers, Some(body)).await
}

/// DELETE /api/:resource?id=
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(resource): Path<String>,
    query: IdQueryResult,
    headers: HeaderMap,
) -> Result<Response> {
    let query = IdQuery::extract(query)?;
    relay(&state, &resource, Verb::Delete, query.id(), &headers, None).await
}

async fn relay(
    state: &AppState,
    resource_name: &str,
    verb: Verb,
    id: Option<&str>,
    headers: &HeaderMap,
    body: Option<Bytes>,
) -> Result<Response> {
    let resource = Resource::lookup(resource_name)
        .ok_or_else(|| GatewayError::UnknownResource(resource_name.to_string()))?;
    if !resource.supports(verb) {
        return Err(GatewayError::MethodNotAllowed);
    }

    let id = if verb.requires_id() {
        Some(require_id(id)?)
    } else {
        None
    };

    let mut store = TokenStore::from_headers(headers, state.cookies);
    let credential = extract_credential(headers, &store).ok_or(GatewayError::Unauthorized)?;

    // Upstream session cookie if we hold one, otherwise whatever the browser sent
    let cookie = credential
        .session_cookie
        .as_deref()
        .or_else(|| headers.get(COOKIE).and_then(|v| v.to_str().ok()));

    let request = UpstreamRequest::new(verb.method(), resource.segments(id))
        .bearer(Some(credential.access_token.as_str()))
        .cookie(cookie)
        .body(body.filter(|_| verb.carries_body()));

    let upstream = state.upstream.send(request).await.map_err(|e| {
        warn!("[WARN] {} {} relay failed: {}", verb.method(), resource.name, e);
        GatewayError::Transport {
            message: PROXY_FAILED,
            details: e.to_string(),
        }
    })?;

    info!(
        "[INFO] {} /api/{}{} -> {}",
        verb.method(),
        resource.name,
        id.map(|id| format!("?id={}", id)).unwrap_or_default(),
        upstream.status
    );

    if upstream.status == StatusCode::UNAUTHORIZED {
        info!("[INFO] Upstream rejected the credential; clearing it");
        store.clear();
    }

    Ok(relay_response(&upstream, &store))
}

fn require_id(id: Option<&str>) -> Result<&str> {
    match id {
        None => Err(GatewayError::MissingId),
        Some("." | "..") => Err(GatewayError::InvalidId),
        Some(id) => Ok(id),
    }
}
