use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use pantry_ids::IdParseError;
use pantry_protocol::BackendError;
use pantry_security::TokenError;
use thiserror::Error;

use crate::render;

/// Handler-level failures. Backend failures are not here: they become page
/// state where the call is made.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Sign in required")]
    Unauthenticated,

    #[error("Unknown pantry: {0}")]
    InvalidPantry(#[from] IdParseError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Could not read upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("{0}")]
    NotFound(String),

    #[error("Could not start session: {0}")]
    Token(#[from] TokenError),

    #[error("Backend client unavailable: {0}")]
    Backend(#[from] BackendError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Unauthenticated => StatusCode::SEE_OTHER,
            WebError::InvalidPantry(_) | WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Multipart(e) => e.status(),
            WebError::Token(_) | WebError::Backend(_) | WebError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if let WebError::Unauthenticated = self {
            return Redirect::to(pantry_security::gate::LOGIN_PATH).into_response();
        }

        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, render::error_page(status, &self.to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let response = WebError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/login");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebError::InvalidPantry(IdParseError::EmptyPantryId).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::BadRequest("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::Internal("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
