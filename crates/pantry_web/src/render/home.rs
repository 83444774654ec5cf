use axum::response::Html;
use pantry_security::Session;

use super::{escape, layout};

pub fn page(session: Option<&Session>) -> Html<String> {
    let action = match session {
        None => r#"<a class="button" href="/login">I am a volunteer</a>"#.to_string(),
        Some(Session {
            pantry_id: Some(pantry_id),
            ..
        }) => format!(
            r#"<a class="button" href="/{}/upload">I am a volunteer</a>"#,
            escape(pantry_id.as_str())
        ),
        Some(_) => r#"<p class="muted">No pantry ID in session.</p>"#.to_string(),
    };

    let sign_out = if session.is_some() {
        r#"<form method="post" action="/api/auth/signout"><button class="link" type="submit">Sign out</button></form>"#
    } else {
        ""
    };

    layout(
        "Pantry Inventory",
        &format!(
            r#"<main class="center">
{action}
{sign_out}
</main>"#
        ),
    )
}
