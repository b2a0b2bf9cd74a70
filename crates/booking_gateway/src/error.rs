//! Gateway error types
//!
//! Every locally-produced failure maps to a status code and a small JSON
//! envelope (`{"message": ...}`, plus `details` for transport failures).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors raised by gateway handlers before or instead of relaying upstream
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No credential on the inbound request (cookie or bearer header)
    #[error("Unauthorized")]
    Unauthorized,

    /// update/delete called without an identifier
    #[error("ID is required")]
    MissingId,

    /// Identifier that cannot name a single upstream record ("." or "..")
    #[error("Invalid ID")]
    InvalidId,

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body")]
    InvalidBody(#[source] serde_json::Error),

    /// Upstream could not be reached or did not produce a readable response
    #[error("{message}: {details}")]
    Transport {
        message: &'static str,
        details: String,
    },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingId | Self::InvalidId | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::UnknownResource(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::Transport { message, details } => json!({
                "message": message,
                "details": details,
            }),
            Self::UnknownResource(_) => json!({ "message": "Unknown resource" }),
            other => json!({ "message": other.to_string() }),
        };

        if self.status().is_server_error() {
            tracing::warn!("[WARN] {}", self);
        }

        (self.status(), Json(body)).into_response()
    }
}
