//! `/{pantryId}/review` handlers.
//!
//! Each GET is a new page instance and reloads the draft. Edits and the
//! handoff render the page directly; redirecting would reload and lose them.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use pantry_ids::PantryId;

use super::{parse_pantry, pantry_scope_redirect};
use crate::error::WebError;
use crate::extract::CurrentSession;
use crate::render;
use crate::review::{EditOutcome, ReviewState};
use crate::scoped::scope_key;
use crate::AppState;

type QuantityForm = Vec<(String, String)>;

fn review_page(pantry_id: &PantryId) -> Redirect {
    Redirect::to(&format!("/{}/review", pantry_id))
}

fn form_fields(form: &QuantityForm) -> impl Iterator<Item = (&str, &str)> {
    form.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

fn log_outcomes(pantry_id: &PantryId, outcomes: &[(String, EditOutcome)]) {
    for (category, outcome) in outcomes {
        match outcome {
            EditOutcome::Updated(quantity) => tracing::debug!(
                pantry_id = %pantry_id,
                category = %category,
                quantity,
                "Quantity edited"
            ),
            EditOutcome::Rejected => tracing::debug!(
                pantry_id = %pantry_id,
                category = %category,
                "Quantity edit rejected"
            ),
            EditOutcome::NotEditable => {}
        }
    }
}

pub async fn review_page_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(pantry_id): Path<String>,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    if let Some(redirect) = pantry_scope_redirect(&session, &pantry_id, "review") {
        return Ok(redirect.into_response());
    }

    let key = scope_key(&session.session_id, &pantry_id);
    state.reviews.replace(&key, ReviewState::Loading);

    let result = state.backend.fetch_draft(&pantry_id).await;
    let snapshot = state.reviews.with(&key, |review| {
        review.load_finished(result);
        review.clone()
    });
    Ok(render::review::page(&pantry_id, &snapshot).into_response())
}

pub async fn edit_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(pantry_id): Path<String>,
    Form(form): Form<QuantityForm>,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    if let Some(redirect) = pantry_scope_redirect(&session, &pantry_id, "review") {
        return Ok(redirect.into_response());
    }

    let key = scope_key(&session.session_id, &pantry_id);
    let applied = state.reviews.with_existing(&key, |review| {
        let outcomes = review.apply_form(form_fields(&form));
        (outcomes, review.clone())
    });
    let Some((outcomes, snapshot)) = applied else {
        return Ok(review_page(&pantry_id).into_response());
    };

    log_outcomes(&pantry_id, &outcomes);
    Ok(render::review::page(&pantry_id, &snapshot).into_response())
}

/// Apply any pending edits, then write the handoff payload.
pub async fn prepare_handoff_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(pantry_id): Path<String>,
    Form(form): Form<QuantityForm>,
) -> Result<Response, WebError> {
    let pantry_id = parse_pantry(&pantry_id)?;
    if let Some(redirect) = pantry_scope_redirect(&session, &pantry_id, "review") {
        return Ok(redirect.into_response());
    }

    let key = scope_key(&session.session_id, &pantry_id);
    let prepared = state.reviews.with_existing(&key, |review| {
        let outcomes = review.apply_form(form_fields(&form));
        let payload = review.prepare_handoff(Utc::now());
        (outcomes, payload, review.clone())
    });
    let Some((outcomes, payload, snapshot)) = prepared else {
        return Ok(review_page(&pantry_id).into_response());
    };
    log_outcomes(&pantry_id, &outcomes);

    if let Some(payload) = payload {
        state
            .handoff
            .write_payload(&session.session_id, &payload)
            .map_err(|e| WebError::Internal(format!("failed to serialize handoff: {}", e)))?;
        tracing::info!(
            pantry_id = %pantry_id,
            categories = payload.reviewed_inventory.as_map().len(),
            "Handoff payload saved"
        );
    }
    Ok(render::review::page(&pantry_id, &snapshot).into_response())
}

/// Raw JSON currently in this session's handoff slot.
pub async fn read_handoff_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(pantry_id): Path<String>,
) -> Result<Response, WebError> {
    parse_pantry(&pantry_id)?;
    let json = state
        .handoff
        .read_payload(&session.session_id)
        .ok_or_else(|| WebError::NotFound("No handoff payload prepared".to_string()))?;
    Ok(([(CONTENT_TYPE, "application/json")], json).into_response())
}
