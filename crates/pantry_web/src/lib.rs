//! Volunteer frontend for pantry inventory.
//!
//! Server-rendered pages over the inventory backend:
//!
//! - **Session gate**: every request passes [`middleware::session_gate_middleware`];
//!   gated pages without a valid session cookie redirect to `/login` with
//!   the requested URL as `callbackUrl`.
//! - **Upload**: `/{pantryId}/upload` keeps a per-session photo selection
//!   with previews and sends it to the backend as one multipart batch.
//! - **Review**: `/{pantryId}/review` loads the backend's draft, lets the
//!   volunteer correct quantities, and writes a handoff payload into the
//!   session's handoff buffer.
//!
//! Page state lives in memory, keyed by session and pantry, and is dropped
//! on sign-out or once the session's token has expired.

pub mod backend;
pub mod config;
pub mod cookies;
pub mod error;
pub mod extract;
pub mod handoff;
pub mod middleware;
pub mod render;
pub mod review;
pub mod routes;
pub mod scoped;
pub mod sessions;
pub mod state;
pub mod upload;

pub use config::{ConfigError, RuntimeConfig, WebArgs};
pub use error::WebError;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use middleware::{request_tracing_middleware, session_gate_middleware};
use pantry_protocol::defaults::SESSION_SWEEP_INTERVAL_SECS;
use routes::assets::{favicon_handler, stylesheet_handler};
use routes::auth::{
    credentials_callback_handler, login_page_handler, session_handler, signin_handler,
    signout_handler,
};
use routes::home::home_handler;
use routes::review::{
    edit_handler, prepare_handoff_handler, read_handoff_handler, review_page_handler,
};
use routes::upload::{
    preview_handler, remove_handler, select_handler, submit_handler, upload_page_handler,
};

async fn not_found_handler() -> WebError {
    WebError::NotFound("Page not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(home_handler))
        .route("/login", get(login_page_handler))
        .route(
            "/api/auth/callback/credentials",
            post(credentials_callback_handler),
        )
        .route("/api/auth/session", get(session_handler))
        .route("/api/auth/signin", get(signin_handler))
        .route("/api/auth/signout", post(signout_handler))
        .route("/static/app.css", get(stylesheet_handler))
        .route("/favicon.ico", get(favicon_handler))
        .route("/:pantry_id/upload", get(upload_page_handler))
        .route(
            "/:pantry_id/upload/select",
            post(select_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/:pantry_id/upload/remove/:index", post(remove_handler))
        .route("/:pantry_id/upload/submit", post(submit_handler))
        .route(
            "/:pantry_id/upload/preview/:preview_id",
            get(preview_handler),
        )
        .route("/:pantry_id/review", get(review_page_handler))
        .route("/:pantry_id/review/edit", post(edit_handler))
        .route(
            "/:pantry_id/review/handoff",
            get(read_handoff_handler).post(prepare_handoff_handler),
        )
        .fallback(not_found_handler)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_gate_middleware,
        ))
        .layer(axum::middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sweeper = tokio::spawn(sweep_expired_sessions(
        state.clone(),
        Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS),
    ));
    let app = build_router(state);
    if let Ok(addr) = listener.local_addr() {
        info!("Server running on {addr}");
    }
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    sweeper.abort();
    result
}

/// Periodically release the state of sessions whose tokens have expired.
async fn sweep_expired_sessions(state: AppState, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        state.sweep_expired(Utc::now());
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
