//! Request extractors for the session attached by the gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pantry_security::Session;
use std::convert::Infallible;

use crate::error::WebError;

/// The signed-in volunteer. Rejects with a login redirect when absent.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or(WebError::Unauthenticated)
    }
}

/// The session if there is one; for public pages.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(parts.extensions.get::<Session>().cloned()))
    }
}
