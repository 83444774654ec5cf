//! Test helpers for the pantry review crates.
//!
//! [`FakeBackend`] stands in for the inventory backend: an axum server on an
//! ephemeral port that answers `GET /inventory/draft/{pantryId}` and
//! `POST /upload` from scripted responses and records what it was sent.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const NO_DRAFT_ERROR: &str = "No draft inventory found for this pantry. Upload photos first.";

/// One part received by the fake `/upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFile {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedUpload {
    pub files: Vec<RecordedFile>,
}

type Scripted = (u16, Value);

#[derive(Default)]
struct FakeState {
    drafts: Mutex<HashMap<String, Scripted>>,
    draft_requests: Mutex<Vec<String>>,
    upload_response: Mutex<Option<Scripted>>,
    upload_delay: Mutex<Duration>,
    uploads: Mutex<Vec<RecordedUpload>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn scripted((status, body): Scripted) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

async fn draft_handler(
    State(state): State<Arc<FakeState>>,
    Path(pantry_id): Path<String>,
) -> Response {
    lock(&state.draft_requests).push(pantry_id.clone());
    let response = lock(&state.drafts).get(&pantry_id).cloned();
    match response {
        Some(response) => scripted(response),
        None => scripted((404, json!({ "ok": false, "error": NO_DRAFT_ERROR }))),
    }
}

async fn upload_handler(State(state): State<Arc<FakeState>>, mut multipart: Multipart) -> Response {
    let mut recorded = RecordedUpload::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return scripted((400, json!({ "ok": false, "error": e.body_text() }))),
        };
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let size_bytes = match field.bytes().await {
            Ok(bytes) => bytes.len(),
            Err(e) => return scripted((400, json!({ "ok": false, "error": e.body_text() }))),
        };
        recorded.files.push(RecordedFile {
            field: name,
            filename,
            content_type,
            size_bytes,
        });
    }
    tracing::debug!(files = recorded.files.len(), "Fake backend received upload");

    let delay = *lock(&state.upload_delay);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let echo = json!({
        "ok": true,
        "count": recorded.files.len(),
        "files": recorded
            .files
            .iter()
            .map(|f| json!({ "ok": true, "filename": f.filename, "size_bytes": f.size_bytes }))
            .collect::<Vec<_>>(),
    });
    lock(&state.uploads).push(recorded);

    let response = lock(&state.upload_response).clone();
    scripted(response.unwrap_or((200, echo)))
}

pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<FakeState>,
    task: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/inventory/draft/:pantry_id", get(draft_handler))
            .route("/upload", post(upload_handler))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake backend stopped");
            }
        });

        Ok(Self { addr, state, task })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer the pantry's draft with `inventory` and one source photo.
    pub fn set_draft(&self, pantry_id: &str, inventory: Value) {
        self.set_draft_response(
            pantry_id,
            200,
            json!({
                "ok": true,
                "draft": {
                    "pantryId": pantry_id,
                    "inventory": inventory,
                    "files": [{ "filename": "shelf-1.jpg", "size_bytes": 1024 }],
                },
            }),
        );
    }

    pub fn set_draft_response(&self, pantry_id: &str, status: u16, body: Value) {
        lock(&self.state.drafts).insert(pantry_id.to_string(), (status, body));
    }

    /// Override the default echo answer of `/upload`.
    pub fn set_upload_response(&self, status: u16, body: Value) {
        *lock(&self.state.upload_response) = Some((status, body));
    }

    pub fn set_upload_delay(&self, delay: Duration) {
        *lock(&self.state.upload_delay) = delay;
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        lock(&self.state.uploads).clone()
    }

    pub fn draft_requests(&self) -> Vec<String> {
        lock(&self.state.draft_requests).clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Smallest valid PNG signature plus an IHDR chunk; enough for a preview.
pub fn png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89,
    ]
}

/// JPEG start/end markers around a little filler.
pub fn jpeg_bytes() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(&[0u8; 64]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// Pick an address nobody is listening on, for "backend down" tests.
pub async fn unused_addr() -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    listener.local_addr()
}
