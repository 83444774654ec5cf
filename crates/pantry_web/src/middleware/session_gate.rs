use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use pantry_security::{evaluate, is_public_path, login_redirect, GateDecision};

use crate::cookies::session_token;
use crate::AppState;

/// Verify the session cookie on every request.
///
/// A valid session is attached as a request extension for the extractors.
/// Signed-out sessions count as no session. Gated paths without one are
/// sent to the login page with the full requested URL as `callbackUrl`.
pub async fn session_gate_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let decision = match evaluate(&state.sessions, &path, session_token(request.headers())) {
        GateDecision::Allow(Some(session)) if state.ledger.is_revoked(&session.session_id) => {
            tracing::debug!(session_id = %session.session_id, "Ignoring signed-out session");
            if is_public_path(&path) {
                GateDecision::Allow(None)
            } else {
                GateDecision::RequireLogin
            }
        }
        decision => decision,
    };

    match decision {
        GateDecision::Allow(session) => {
            if let Some(session) = session {
                tracing::Span::current().record("user_id", session.user_id.as_str());
                state.ledger.touch(&session);
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        GateDecision::RequireLogin => {
            let mut return_to = state.origin(request.headers());
            return_to.set_path(&path);
            return_to.set_query(request.uri().query());
            tracing::info!(path = %path, "No session, redirecting to login");
            Redirect::to(&login_redirect(return_to.as_str())).into_response()
        }
    }
}
