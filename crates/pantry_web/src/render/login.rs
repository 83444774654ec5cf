use axum::response::Html;

use super::{escape, layout};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password. Please try again.";

pub fn page(callback_url: Option<&str>, username: &str, error: Option<&str>) -> Html<String> {
    let error = error
        .map(|message| {
            format!(
                r#"<div class="alert error" role="alert">{}</div>"#,
                escape(message)
            )
        })
        .unwrap_or_default();
    let callback = callback_url
        .map(|url| {
            format!(
                r#"<input type="hidden" name="callbackUrl" value="{}">"#,
                escape(url)
            )
        })
        .unwrap_or_default();

    layout(
        "Pantry Login",
        &format!(
            r#"<main class="card narrow">
<h1>Pantry Login</h1>
<p class="muted">Enter your credentials to access your inventory.</p>
<form method="post" action="/api/auth/callback/credentials" class="stack">
{error}
{callback}
<label for="username">Username</label>
<input id="username" name="username" type="text" placeholder="jsmith" value="{username}" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
<button type="submit">Sign In</button>
</form>
</main>"#,
            username = escape(username),
        ),
    )
}
