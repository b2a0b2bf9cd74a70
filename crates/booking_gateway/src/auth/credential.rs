use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::token_store::{Credential, TokenStore};

/// Pull the forwarding credential off an inbound request
///
/// The `accessToken` cookie wins; an `Authorization: Bearer` header is the
/// fallback. Presence only: an expired or forged token is upstream's problem.
pub fn extract_credential(headers: &HeaderMap, store: &TokenStore) -> Option<Credential> {
    if let Some(credential) = store.get() {
        return Some(credential);
    }

    bearer_token(headers).map(|token| {
        Credential::new(token).with_session_cookie(store.session_cookie().map(str::to_string))
    })
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CookieSettings;
    use axum::http::{header::COOKIE, HeaderValue};

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    fn extract(headers: &HeaderMap) -> Option<Credential> {
        let store = TokenStore::from_headers(headers, CookieSettings::default());
        extract_credential(headers, &store)
    }

    #[test]
    fn test_cookie_preferred_over_bearer() {
        let headers = headers(&[
            (COOKIE, "accessToken=from-cookie"),
            (AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(extract(&headers).unwrap().access_token, "from-cookie");
    }

    #[test]
    fn test_bearer_fallback() {
        let headers = headers(&[(AUTHORIZATION, "Bearer from-header")]);
        let credential = extract(&headers).unwrap();
        assert_eq!(credential.access_token, "from-header");
        assert_eq!(credential.session_cookie, None);
    }

    #[test]
    fn test_bearer_fallback_keeps_session_cookie() {
        let headers = headers(&[(COOKIE, "apiCookie=sid"), (AUTHORIZATION, "Bearer tok")]);
        let credential = extract(&headers).unwrap();
        assert_eq!(credential.session_cookie.as_deref(), Some("sid"));
    }

    #[test]
    fn test_absent_credential() {
        assert!(extract(&HeaderMap::new()).is_none());
        assert!(extract(&headers(&[(AUTHORIZATION, "Basic dXNlcjpwdw==")])).is_none());
        assert!(extract(&headers(&[(AUTHORIZATION, "Bearer ")])).is_none());
        assert!(extract(&headers(&[(COOKIE, "theme=dark")])).is_none());
    }
}
