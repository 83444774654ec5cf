use axum::response::Html;

use crate::extract::MaybeSession;
use crate::render;

pub async fn home_handler(MaybeSession(session): MaybeSession) -> Html<String> {
    render::home::page(session.as_ref())
}
