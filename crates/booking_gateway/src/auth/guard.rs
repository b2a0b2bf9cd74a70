//! Navigation guard for dashboard pages
//!
//! The one place that decides whether a page navigation may proceed, based
//! solely on whether the token store currently holds a credential.

use serde::Serialize;

pub const SIGN_IN_PATH: &str = "/auth/sign-in";
pub const SIGN_UP_PATH: &str = "/auth/sign-up";
pub const HOME_PATH: &str = "/";

/// Pages reachable without a credential
const PUBLIC_PATHS: [&str; 2] = [SIGN_IN_PATH, SIGN_UP_PATH];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum GuardDecision {
    Allow,
    Redirect { location: &'static str },
}

pub fn evaluate(path: &str, authenticated: bool) -> GuardDecision {
    let path = normalize(path);

    if !authenticated && !PUBLIC_PATHS.contains(&path) {
        return GuardDecision::Redirect {
            location: SIGN_IN_PATH,
        };
    }

    if authenticated && path == SIGN_IN_PATH {
        return GuardDecision::Redirect {
            location: HOME_PATH,
        };
    }

    GuardDecision::Allow
}

// "/auth/sign-in/" and "/auth/sign-in" are the same page
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH
    } else {
        trimmed
    }
}
