//! Upstream booking API client
//!
//! Performs exactly one HTTP call per request against the configured base
//! URL. Non-2xx answers are ordinary results to be relayed; only a call that
//! never produced a readable response is an error.

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
    Method, StatusCode,
};
use bytes::Bytes;
use serde::de::IgnoredAny;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// No response at all: connect failure, timeout, broken body stream
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// One outbound call
#[derive(Debug, Clone)]
pub struct UpstreamRequest<'a> {
    pub method: Method,
    /// Path segments below the base URL, percent-encoded on the way out
    pub segments: Vec<&'a str>,
    pub bearer: Option<&'a str>,
    pub cookie: Option<&'a str>,
    pub body: Option<Bytes>,
}

impl<'a> UpstreamRequest<'a> {
    pub fn new(method: Method, segments: Vec<&'a str>) -> Self {
        Self {
            method,
            segments,
            bearer: None,
            cookie: None,
            body: None,
        }
    }

    pub fn bearer(mut self, token: Option<&'a str>) -> Self {
        self.bearer = token;
        self
    }

    pub fn cookie(mut self, cookie: Option<&'a str>) -> Self {
        self.cookie = cookie.filter(|c| !c.is_empty());
        self
    }

    pub fn body(mut self, body: Option<Bytes>) -> Self {
        self.body = body;
        self
    }
}

/// What upstream answered, kept as text until the caller decides how to relay it
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
    pub set_cookies: Vec<String>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Structured body, if upstream sent JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Body to hand back to the dashboard: upstream's own JSON text untouched,
    /// anything else wrapped as `{"data": "<raw text>"}`
    pub fn relay_body(&self) -> String {
        // IgnoredAny checks syntax without converting numbers, so values an
        // f64 cannot hold still count as JSON
        if serde_json::from_str::<IgnoredAny>(&self.body).is_ok() {
            self.body.clone()
        } else {
            json!({ "data": self.body }).to_string()
        }
    }

    /// `message` field of a JSON error body
    pub fn message(&self) -> Option<String> {
        self.json()?
            .get("message")?
            .as_str()
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// All upstream `Set-Cookie` values joined into one cookie string
    pub fn session_cookie(&self) -> Option<String> {
        if self.set_cookies.is_empty() {
            None
        } else {
            Some(self.set_cookies.join("; "))
        }
    }
}

/// HTTP client bound to the upstream base URL
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments below the base URL
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn send(&self, request: UpstreamRequest<'_>) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.endpoint(&request.segments)?;
        debug!("Upstream {} {}", request.method, url);

        let mut builder = self
            .http_client
            .request(request.method.clone(), url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(cookie) = request.cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response.text().await?;

        debug!("Upstream answered {} ({} bytes)", status, body.len());

        Ok(UpstreamResponse {
            status,
            body,
            set_cookies,
        })
    }
}
