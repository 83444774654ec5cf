//! Sign-in, session and sign-out endpoints under `/login` and `/api/auth`.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::{SecondsFormat, Utc};
use pantry_security::gate::LOGIN_PATH;
use pantry_security::{login_redirect, safe_return_target};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cookies::{clear_session_cookie, session_cookie};
use crate::error::WebError;
use crate::extract::MaybeSession;
use crate::render;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

pub async fn login_page_handler(Query(query): Query<CallbackQuery>) -> Html<String> {
    render::login::page(query.callback_url.as_deref(), "", None)
}

/// `GET /api/auth/signin` sends the browser to the login form.
pub async fn signin_handler(Query(query): Query<CallbackQuery>) -> Redirect {
    match query.callback_url.as_deref() {
        Some(callback) => Redirect::to(&login_redirect(callback)),
        None => Redirect::to(LOGIN_PATH),
    }
}

pub async fn credentials_callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, WebError> {
    let Some(identity) = state
        .credentials
        .verify(form.username.trim(), &form.password)
    else {
        tracing::info!(username = %form.username, "Sign-in rejected");
        let page = render::login::page(
            form.callback_url.as_deref(),
            &form.username,
            Some(render::login::INVALID_CREDENTIALS),
        );
        return Ok((StatusCode::UNAUTHORIZED, page).into_response());
    };

    let (token, session) = state.sessions.issue(&identity, Utc::now())?;
    let cookie = session_cookie(
        &token,
        state.sessions.max_age().num_seconds(),
        state.config.secure_cookies(),
    );
    let target = safe_return_target(form.callback_url.as_deref(), &state.origin(&headers));

    tracing::info!(
        user_id = %session.user_id,
        session_id = %session.session_id,
        target = %target,
        "Signed in"
    );
    Ok(([(SET_COOKIE, cookie)], Redirect::to(&target)).into_response())
}

/// `GET /api/auth/session`: the current session, or `{}`.
pub async fn session_handler(MaybeSession(session): MaybeSession) -> Json<Value> {
    let Some(session) = session else {
        return Json(json!({}));
    };
    Json(json!({
        "user": {
            "id": session.user_id,
            "name": session.name,
            "email": session.email,
            "pantryId": session.pantry_id,
        },
        "expires": session.expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub async fn signout_handler(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Response {
    if let Some(session) = session {
        state.ledger.revoke(&session);
        state.purge_session(&session.session_id);
        tracing::info!(user_id = %session.user_id, session_id = %session.session_id, "Signed out");
    }
    (
        [(SET_COOKIE, clear_session_cookie(state.config.secure_cookies()))],
        Redirect::to(LOGIN_PATH),
    )
        .into_response()
}
