//! Booking Gateway HTTP Server
//!
//! Relays dashboard requests to the upstream booking API and keeps the
//! upstream credential in the browser's cookie jar.

pub mod auth_handlers;
pub mod relay_handlers;
pub mod resources;

use crate::config::{CookieSettings, GatewayConfig, TtlPolicy};
use crate::upstream::{UpstreamClient, UpstreamResponse};
use crate::TokenStore;
use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router as AxumRouter,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pooled client bound to the upstream base URL
    pub upstream: UpstreamClient,
    /// Credential lifetime policy for login/registration
    pub ttl: TtlPolicy,
    /// Attributes for credential cookies
    pub cookies: CookieSettings,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        let upstream = UpstreamClient::new(config.upstream_base()?, config.upstream_timeout())
            .map_err(|e| anyhow::anyhow!("Failed to build upstream client: {}", e))?;

        Ok(Self {
            upstream,
            ttl: config.ttl_policy()?,
            cookies: config.cookie_settings()?,
        })
    }
}

/// Build the gateway router
///
/// - GET    /health
/// - POST   /api/auth/login
/// - POST   /api/auth/register
/// - POST   /api/auth/logout
/// - GET    /api/auth/session
/// - GET    /api/auth/guard?path=
/// - GET    /api/:resource[?id=]
/// - POST   /api/:resource
/// - PUT    /api/:resource?id=
/// - DELETE /api/:resource?id=
pub fn router(state: Arc<AppState>) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/api/auth/register", post(auth_handlers::register))
        .route("/api/auth/logout", post(auth_handlers::logout))
        .route("/api/auth/session", get(auth_handlers::session))
        .route("/api/auth/guard", get(auth_handlers::navigation_guard))
        .route(
            "/api/:resource",
            get(relay_handlers::list_or_get)
                .post(relay_handlers::create)
                .put(relay_handlers::update)
                .delete(relay_handlers::remove),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Booking Gateway HTTP server
///
/// # Errors
/// Returns error if the configuration is invalid or binding fails
pub async fn start_server(config: GatewayConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    info!("[OK] Upstream booking API: {}", state.upstream.base_url());

    let app = router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("[INFO] Booking Gateway listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// JSON response carrying any pending credential cookie changes
pub(crate) fn json_response(status: StatusCode, body: Value, store: &TokenStore) -> Response {
    let mut response = (status, Json(body)).into_response();
    store.apply(response.headers_mut());
    response
}

/// Relay an upstream answer: same status, upstream JSON as-is (or wrapped text)
pub(crate) fn relay_response(upstream: &UpstreamResponse, store: &TokenStore) -> Response {
    let mut response = if upstream.status == StatusCode::NO_CONTENT {
        upstream.status.into_response()
    } else {
        (
            upstream.status,
            [(CONTENT_TYPE, "application/json")],
            upstream.relay_body(),
        )
            .into_response()
    };
    store.apply(response.headers_mut());
    response
}
