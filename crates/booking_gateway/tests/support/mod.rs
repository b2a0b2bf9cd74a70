#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header::SET_COOKIE, HeaderMap, Request, StatusCode},
    Router,
};
use booking_gateway::{router, AppState, CookieSettings, TtlPolicy, UpstreamClient};
use bytes::Bytes;
use std::sync::Arc;
use tower::ServiceExt;
use url::Url;

/// Nothing listens on port 1
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1/api";

pub fn app(upstream_url: &str) -> Router {
    let state = AppState {
        upstream: UpstreamClient::new(Url::parse(upstream_url).unwrap(), None).unwrap(),
        ttl: TtlPolicy::default(),
        cookies: CookieSettings::default(),
    };
    router(Arc::new(state))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    /// What a browser would send back after applying our Set-Cookie headers
    pub fn cookie_replay(&self) -> String {
        self.set_cookies()
            .iter()
            .map(|c| c.split(';').next().unwrap().to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn request(method: &str, uri: &str, headers: &[(&str, &str)], body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap()
}
