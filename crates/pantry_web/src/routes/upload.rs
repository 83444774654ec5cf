//! `/{pantryId}/upload` handlers.
//!
//! Mutating endpoints answer with a 303 back to the page so a refresh never
//! re-posts a batch.

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Redirect, Response};
use pantry_ids::{PantryId, PreviewId};

use super::{parse_pantry, pantry_scope_redirect};
use crate::error::WebError;
use crate::extract::CurrentSession;
use crate::render;
use crate::scoped::scope_key;
use crate::upload::{SelectedFile, SubmitRefused, UploadResult};
use crate::AppState;

const FILES_FIELD: &str = "files";

fn upload_page(pantry_id: &PantryId) -> Redirect {
    Redirect::to(&format!("/{}/upload", pantry_id))
}

pub async fn upload_page_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(pantry_id): Path<String>,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    if let Some(redirect) = pantry_scope_redirect(&session, &pantry_id, "upload") {
        return Ok(redirect.into_response());
    }

    let key = scope_key(&session.session_id, &pantry_id);
    let view = state.uploads.with(&key, |selection| selection.view());
    Ok(render::upload::page(&pantry_id, &view).into_response())
}

/// Replace the selection with the image parts of a multipart `files` field.
pub async fn select_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(pantry_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    if let Some(redirect) = pantry_scope_redirect(&session, &pantry_id, "upload") {
        return Ok(redirect.into_response());
    }

    let mut candidates = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        // an empty file input still submits one nameless, empty part
        if filename.is_empty() && bytes.is_empty() {
            continue;
        }
        candidates.push(SelectedFile {
            filename,
            content_type,
            bytes,
        });
    }

    let offered = candidates.len();
    let key = scope_key(&session.session_id, &pantry_id);
    let (superseded, selected) = state.uploads.with(&key, |selection| {
        let superseded = selection.select(candidates, &state.previews, &session.session_id);
        (superseded, selection.len())
    });
    let released = superseded.len();
    drop(superseded);

    tracing::info!(
        pantry_id = %pantry_id,
        offered,
        selected,
        released,
        "Updated photo selection"
    );
    Ok(upload_page(&pantry_id).into_response())
}

pub async fn remove_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((pantry_id, index)): Path<(String, usize)>,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    if let Some(redirect) = pantry_scope_redirect(&session, &pantry_id, "upload") {
        return Ok(redirect.into_response());
    }

    let key = scope_key(&session.session_id, &pantry_id);
    let removed = state.uploads.with(&key, |selection| selection.remove(index));
    match removed {
        Some((file, preview)) => {
            drop(preview);
            tracing::debug!(
                pantry_id = %pantry_id,
                index,
                filename = %file.filename,
                "Removed photo"
            );
        }
        None => tracing::debug!(pantry_id = %pantry_id, index, "Nothing to remove at index"),
    }
    Ok(upload_page(&pantry_id).into_response())
}

pub async fn submit_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(pantry_id): Path<String>,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    if let Some(redirect) = pantry_scope_redirect(&session, &pantry_id, "upload") {
        return Ok(redirect.into_response());
    }

    let key = scope_key(&session.session_id, &pantry_id);
    match state.uploads.begin_submit(&key) {
        Ok((in_flight, files)) => {
            let result = match state.backend.upload(&files).await {
                Ok(outcome) => UploadResult::Accepted(outcome),
                Err(e) => UploadResult::Failed(e.to_string()),
            };
            in_flight.finish(result);
        }
        Err(SubmitRefused::Empty) => {
            tracing::debug!(pantry_id = %pantry_id, "Submit with no photos selected");
        }
        Err(SubmitRefused::AlreadyInFlight) => {
            tracing::info!(pantry_id = %pantry_id, "Submit ignored, upload already in flight");
        }
    }
    Ok(upload_page(&pantry_id).into_response())
}

pub async fn preview_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((pantry_id, preview_id)): Path<(String, String)>,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    let not_found = || WebError::NotFound("Preview not found".to_string());
    let preview_id = PreviewId::parse(&preview_id).map_err(|_| not_found())?;

    let key = scope_key(&session.session_id, &pantry_id);
    let held = state
        .uploads
        .with(&key, |selection| selection.holds_preview(&preview_id));
    if !held {
        return Err(not_found());
    }
    let (content_type, bytes) = state
        .previews
        .get(&session.session_id, &preview_id)
        .ok_or_else(not_found)?;

    Ok((
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, "private, no-store".to_string()),
        ],
        bytes,
    )
        .into_response())
}
