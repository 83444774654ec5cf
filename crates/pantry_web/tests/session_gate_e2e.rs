//! Session gate and auth endpoints, end to end over HTTP.

mod harness;

use harness::{body, location, session_cookie, TestApp, PANTRY, PASSWORD};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_unauthenticated_upload_redirects_to_login() {
    let app = TestApp::start().await;

    let response = app.get("/p123/upload", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let target = location(&response);
    assert!(target.starts_with("/login?callbackUrl="), "{}", target);
    assert!(target.ends_with("p123%2Fupload"), "{}", target);
}

#[tokio::test]
async fn test_return_url_keeps_query() {
    let app = TestApp::start().await;
    let response = app.get("/p123/review?from=email", None).await;
    let target = location(&response);
    assert!(target.ends_with("p123%2Freview%3Ffrom%3Demail"), "{}", target);
}

#[tokio::test]
async fn test_public_paths_need_no_session() {
    let app = TestApp::start().await;

    for path in ["/", "/login", "/static/app.css", "/api/auth/session"] {
        let response = app.get(path, None).await;
        assert!(response.status().is_success(), "{} -> {}", path, response.status());
    }

    let home = body(app.get("/", None).await).await;
    assert!(home.contains(r#"href="/login""#));
}

#[tokio::test]
async fn test_forged_cookie_is_not_a_session() {
    let app = TestApp::start().await;
    let response = app
        .get("/p123/upload", Some("pantry.session-token=not.a.jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login"));
}

#[tokio::test]
async fn test_login_sets_cookie_and_honors_callback() {
    let app = TestApp::start().await;
    let callback = format!("{}/p123/review", app.url);

    let response = app
        .post_form(
            "/api/auth/callback/credentials",
            None,
            &[
                ("username", PANTRY),
                ("password", PASSWORD),
                ("callbackUrl", callback.as_str()),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/p123/review");

    let set_cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("Secure"));

    let cookie = session_cookie(&response).unwrap();
    let page = app.get("/p123/upload", Some(&cookie)).await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_foreign_callback_falls_back_to_home() {
    let app = TestApp::start().await;
    let response = app
        .post_form(
            "/api/auth/callback/credentials",
            None,
            &[
                ("username", PANTRY),
                ("password", PASSWORD),
                ("callbackUrl", "https://evil.example/p123/upload"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_callback_with_newline_falls_back_to_home() {
    let app = TestApp::start().await;
    let response = app
        .post_form(
            "/api/auth/callback/credentials",
            None,
            &[
                ("username", PANTRY),
                ("password", PASSWORD),
                ("callbackUrl", "/p123/upload\nx"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn test_bad_credentials_render_inline() {
    let app = TestApp::start().await;
    let response = app
        .post_form(
            "/api/auth/callback/credentials",
            None,
            &[("username", PANTRY), ("password", "wrong")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());
    let page = body(response).await;
    assert!(page.contains("Invalid username or password. Please try again."));
}

#[tokio::test]
async fn test_session_endpoint() {
    let app = TestApp::start().await;

    let anonymous: Value = app.get("/api/auth/session", None).await.json().await.unwrap();
    assert_eq!(anonymous, serde_json::json!({}));

    let cookie = app.login().await;
    let session: Value = app
        .get("/api/auth/session", Some(&cookie))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(session["user"]["pantryId"], PANTRY);
    assert_eq!(session["user"]["name"], "Admin");
}

#[tokio::test]
async fn test_home_links_to_own_pantry() {
    let app = TestApp::start().await;
    let cookie = app.login().await;
    let home = body(app.get("/", Some(&cookie)).await).await;
    assert!(home.contains(r#"href="/p123/upload""#));
}

#[tokio::test]
async fn test_other_pantry_redirects_to_own() {
    let app = TestApp::start().await;
    let cookie = app.login().await;

    let upload = app.get("/p999/upload", Some(&cookie)).await;
    assert_eq!(upload.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&upload), "/p123/upload");

    let review = app.get("/p999/review", Some(&cookie)).await;
    assert_eq!(location(&review), "/p123/review");
}

#[tokio::test]
async fn test_signout_clears_cookie() {
    let app = TestApp::start().await;
    let cookie = app.login().await;

    let response = app.post_empty("/api/auth/signout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cleared = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cleared.starts_with("pantry.session-token=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = TestApp::start().await;
    let response = app.get("/", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_signed_out_cookie_no_longer_authenticates() {
    let app = TestApp::start().await;
    let cookie = app.login().await;
    assert_eq!(app.get("/p123/upload", Some(&cookie)).await.status(), StatusCode::OK);

    app.post_empty("/api/auth/signout", Some(&cookie)).await;

    let response = app.get("/p123/upload", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/login?callbackUrl="));

    let session: Value = app
        .get("/api/auth/session", Some(&cookie))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(session, serde_json::json!({}));
}
