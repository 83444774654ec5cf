//! HTTP client for the inventory backend.
//!
//! Every call is bounded by the configured request timeout, so a backend
//! that never answers surfaces as [`BackendError::Timeout`] instead of a
//! page stuck "in progress".

use pantry_ids::PantryId;
use pantry_protocol::{
    parse_draft_response, parse_upload_response, BackendError, InventoryDraft, UploadOutcome,
};
use reqwest::multipart::{Form, Part};
use std::time::{Duration, Instant};
use url::Url;

use crate::upload::SelectedFile;

#[derive(Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(
        base_url: Url,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            http_client,
            base_url,
            timeout,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport(format!("bad backend URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        tracing::warn!(url = ?err.url().map(Url::as_str), error = %err, "Backend request failed");
        if err.is_timeout() {
            BackendError::Timeout(self.timeout.as_secs())
        } else {
            BackendError::Transport(err.to_string())
        }
    }

    /// `GET /inventory/draft/{pantryId}`
    pub async fn fetch_draft(&self, pantry_id: &PantryId) -> Result<InventoryDraft, BackendError> {
        let url = self.endpoint(&["inventory", "draft", pantry_id.as_str()])?;
        let started = Instant::now();

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        let result = parse_draft_response(status, &body, pantry_id);
        match &result {
            Ok(draft) => tracing::info!(
                pantry_id = %pantry_id,
                photos = draft.photo_count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Loaded inventory draft"
            ),
            Err(e) => {
                tracing::warn!(pantry_id = %pantry_id, status, error = %e, "Draft load failed")
            }
        }
        result
    }

    /// `POST /upload` with every file under the repeated `files` field.
    pub async fn upload(&self, files: &[SelectedFile]) -> Result<UploadOutcome, BackendError> {
        let url = self.endpoint(&["upload"])?;
        let started = Instant::now();

        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.to_vec())
                .file_name(file.filename.clone())
                .mime_str(&file.content_type)
                .map_err(|e| BackendError::Transport(e.to_string()))?;
            form = form.part("files", part);
        }

        let response = self
            .http_client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        let result = parse_upload_response(status, &body);
        match &result {
            Ok(outcome) => tracing::info!(
                sent = files.len(),
                accepted = outcome.count,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Batch upload finished"
            ),
            Err(e) => tracing::warn!(sent = files.len(), status, error = %e, "Batch upload failed"),
        }
        result
    }
}
