//! Session gate decisions.
//!
//! Pure functions: the HTTP layer extracts the path and cookie, asks
//! [`evaluate`], and turns the answer into a pass-through or a redirect.

use url::{form_urlencoded, Url};

use crate::session::{Session, SessionKeys};

pub const LOGIN_PATH: &str = "/login";
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Paths reachable without a session, matched on whole segments.
const PUBLIC_PREFIXES: &[&str] = &["/login", "/api/auth", "/static"];
const PUBLIC_EXACT: &[&str] = &["/", "/favicon.ico"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass through. A valid session is attached even on public paths.
    Allow(Option<Session>),
    /// No valid session on a gated path.
    RequireLogin,
}

pub fn is_public_path(path: &str) -> bool {
    if PUBLIC_EXACT.contains(&path) {
        return true;
    }
    PUBLIC_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

pub fn evaluate(keys: &SessionKeys, path: &str, token: Option<&str>) -> GateDecision {
    let session = token.and_then(|token| match keys.verify(token) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!(path, error = %e, "Ignoring session cookie");
            None
        }
    });

    if session.is_some() || is_public_path(path) {
        GateDecision::Allow(session)
    } else {
        GateDecision::RequireLogin
    }
}

/// `/login?callbackUrl=<return_to>`
pub fn login_redirect(return_to: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(CALLBACK_PARAM, return_to)
        .finish();
    format!("{}?{}", LOGIN_PATH, query)
}

/// Where to send the volunteer after sign-in.
///
/// Local paths and absolute URLs on `origin` are honored (as a local path);
/// anything else lands on `/`. The result is always a valid `Location`
/// header value.
pub fn safe_return_target(candidate: Option<&str>, origin: &Url) -> String {
    let Some(candidate) = candidate.map(str::trim).filter(|c| !c.is_empty()) else {
        return "/".to_string();
    };
    if candidate.chars().any(char::is_control) {
        return "/".to_string();
    }

    if candidate.starts_with('/') {
        if candidate.starts_with("//") || candidate.starts_with("/\\") {
            return "/".to_string();
        }
        return candidate.to_string();
    }

    match Url::parse(candidate) {
        Ok(url) if url.origin() == origin.origin() => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        _ => "/".to_string(),
    }
}
