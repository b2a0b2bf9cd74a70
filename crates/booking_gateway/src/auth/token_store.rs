use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use cookie::{time, Cookie, CookieJar};
use std::time::Duration;
use tracing::debug;

use crate::config::CookieSettings;

/// Cookie holding the upstream bearer token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie holding the raw upstream session cookie string
pub const SESSION_COOKIE: &str = "apiCookie";

/// Opaque credential issued by the upstream API
///
/// Never parsed or validated locally; the token is forwarded as a bearer
/// and the session cookie (if any) is forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub session_cookie: Option<String>,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            session_cookie: None,
        }
    }

    pub fn with_session_cookie(mut self, session_cookie: Option<String>) -> Self {
        self.session_cookie = session_cookie.filter(|c| !c.is_empty());
        self
    }
}

/// Browser-side credential storage, seen from the server
///
/// Loaded from the inbound `Cookie` header. `set` and `clear` only record
/// changes; `apply` writes them to a response as `Set-Cookie` headers.
#[derive(Debug, Clone)]
pub struct TokenStore {
    jar: CookieJar,
    settings: CookieSettings,
}

impl TokenStore {
    pub fn new(settings: CookieSettings) -> Self {
        Self {
            jar: CookieJar::new(),
            settings,
        }
    }

    /// Load the cookie jar sent by the browser
    pub fn from_headers(headers: &HeaderMap, settings: CookieSettings) -> Self {
        let mut jar = CookieJar::new();

        for value in headers.get_all(COOKIE) {
            let Ok(raw) = value.to_str() else {
                debug!("Skipping non-ASCII Cookie header");
                continue;
            };
            for parsed in Cookie::split_parse_encoded(raw.to_string()) {
                match parsed {
                    Ok(cookie) => jar.add_original(cookie.into_owned()),
                    Err(e) => debug!("Skipping malformed cookie: {}", e),
                }
            }
        }

        Self { jar, settings }
    }

    /// Current credential, if an access token cookie is present
    pub fn get(&self) -> Option<Credential> {
        let token = self.forwardable(ACCESS_TOKEN_COOKIE)?;
        let session_cookie = self.session_cookie().map(str::to_string);
        Some(Credential::new(token).with_session_cookie(session_cookie))
    }

    /// Upstream session cookie, independent of the access token
    pub fn session_cookie(&self) -> Option<&str> {
        self.forwardable(SESSION_COOKIE)
    }

    // Decoded values end up in upstream request headers; anything that
    // cannot be a header value (CR, LF, other controls) counts as absent
    fn forwardable(&self, name: &str) -> Option<&str> {
        let value = self.jar.get(name)?.value();
        if value.is_empty() {
            return None;
        }
        if HeaderValue::from_str(value).is_err() {
            debug!("Ignoring {} cookie that is not a valid header value", name);
            return None;
        }
        Some(value)
    }

    /// Store the credential for `ttl`
    pub fn set(&mut self, credential: &Credential, ttl: Duration) {
        let token = self.build_cookie(ACCESS_TOKEN_COOKIE, credential.access_token.clone(), ttl);
        self.jar.add(token);

        match &credential.session_cookie {
            Some(session) => {
                let session = self.build_cookie(SESSION_COOKIE, session.clone(), ttl);
                self.jar.add(session);
            }
            None => self.jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        }
    }

    /// Drop every piece of credential material
    ///
    /// Removal cookies are emitted even for names the browser did not send,
    /// so a credential held under another request's cookie scope is expired too.
    pub fn clear(&mut self) {
        for name in [ACCESS_TOKEN_COOKIE, SESSION_COOKIE] {
            if self.jar.get(name).is_none() {
                self.jar.add_original(Cookie::build((name, "")).path("/"));
            }
            self.jar.remove(Cookie::build(name).path("/"));
        }
    }

    /// Append one `Set-Cookie` header per pending change
    pub fn apply(&self, headers: &mut HeaderMap) {
        for cookie in self.jar.delta() {
            match HeaderValue::from_str(&cookie.encoded().to_string()) {
                Ok(value) => {
                    headers.append(SET_COOKIE, value);
                }
                Err(e) => debug!("Dropping unencodable cookie {}: {}", cookie.name(), e),
            }
        }
    }

    fn build_cookie(&self, name: &'static str, value: String, ttl: Duration) -> Cookie<'static> {
        let max_age = time::Duration::seconds(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX));

        Cookie::build((name, value))
            .path("/")
            .max_age(max_age)
            .http_only(false)
            .secure(self.settings.secure)
            .same_site(self.settings.same_site)
            .build()
    }
}
