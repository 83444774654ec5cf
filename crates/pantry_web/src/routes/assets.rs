use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;

const APP_CSS: &str = include_str!("../assets/app.css");

pub async fn stylesheet_handler() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        APP_CSS,
    )
}

pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
