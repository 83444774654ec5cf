//! Test harness for end-to-end tests against the real router.
//!
//! Starts a [`FakeBackend`] and the frontend on ephemeral ports, and drives
//! the frontend over HTTP with a non-redirecting client. Cookies are handled
//! by hand so tests can see exactly what was set.
//!
//! ```ignore
//! let app = TestApp::start().await;
//! let cookie = app.login().await;
//! let page = app.get("/p123/upload", Some(&cookie)).await;
//! ```

#![allow(dead_code)]

use clap::Parser;
use pantry_security::StaticCredentials;
use pantry_test_utils::FakeBackend;
use pantry_web::{serve, AppState, RuntimeConfig, WebArgs};
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{redirect, Response, StatusCode};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PANTRY: &str = "p123";
pub const PASSWORD: &str = "hunter2";

pub struct TestApp {
    pub url: String,
    pub backend: FakeBackend,
    pub state: AppState,
    pub client: reqwest::Client,
    task: JoinHandle<()>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestApp {
    pub async fn start() -> Self {
        Self::start_with(&[]).await
    }

    /// Start with extra command-line flags.
    pub async fn start_with(extra: &[&str]) -> Self {
        let backend = FakeBackend::start().await.expect("fake backend");
        let backend_url = backend.url();

        let mut argv = vec![
            "pantry-web",
            "--bind",
            "127.0.0.1:0",
            "--environment",
            "development",
            "--session-secret",
            "integration-test-secret",
        ];
        // clap rejects a repeated flag, so only supply the default backend
        // URL when the caller doesn't provide its own.
        if !extra.contains(&"--api-url") {
            argv.extend_from_slice(&["--api-url", backend_url.as_str()]);
        }
        argv.extend_from_slice(extra);
        let args = WebArgs::try_parse_from(argv).expect("args");
        let config = RuntimeConfig::from_args(&args).expect("config");

        let state = AppState::new(config, Arc::new(StaticCredentials::new(PANTRY, PASSWORD)))
            .expect("state");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}", listener.local_addr().expect("addr"));

        let server_state = state.clone();
        let task = tokio::spawn(async move {
            let _ = serve(listener, server_state, std::future::pending()).await;
        });

        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("client");

        Self {
            url,
            backend,
            state,
            client,
            task,
        }
    }

    fn with_cookie(
        &self,
        builder: reqwest::RequestBuilder,
        cookie: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        self.with_cookie(self.client.get(format!("{}{}", self.url, path)), cookie)
            .send()
            .await
            .expect("GET")
    }

    pub async fn post_form(
        &self,
        path: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response {
        self.with_cookie(self.client.post(format!("{}{}", self.url, path)), cookie)
            .form(fields)
            .send()
            .await
            .expect("POST form")
    }

    pub async fn post_empty(&self, path: &str, cookie: Option<&str>) -> Response {
        self.with_cookie(self.client.post(format!("{}{}", self.url, path)), cookie)
            .send()
            .await
            .expect("POST")
    }

    /// POST `files` as repeated multipart `files` parts.
    pub async fn post_files(
        &self,
        path: &str,
        cookie: Option<&str>,
        files: &[(&str, &str, Vec<u8>)],
    ) -> Response {
        let mut form = Form::new();
        for (name, mime, bytes) in files {
            let part = Part::bytes(bytes.clone())
                .file_name(name.to_string())
                .mime_str(mime)
                .expect("mime");
            form = form.part("files", part);
        }
        self.with_cookie(self.client.post(format!("{}{}", self.url, path)), cookie)
            .multipart(form)
            .send()
            .await
            .expect("POST multipart")
    }

    /// Sign in with `username` and return the `Cookie` header value.
    pub async fn login_as(&self, username: &str) -> String {
        let response = self
            .post_form(
                "/api/auth/callback/credentials",
                None,
                &[("username", username), ("password", PASSWORD)],
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "login failed");
        session_cookie(&response).expect("session cookie")
    }

    pub async fn login(&self) -> String {
        self.login_as(PANTRY).await
    }
}

/// `name=value` of the session cookie set by `response`.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("pantry.session-token="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body(response: Response) -> String {
    response.text().await.expect("body")
}
