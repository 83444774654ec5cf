//! Backend HTTP API types.
//!
//! The backend answers with loosely shaped JSON envelopes. The `*Envelope`
//! structs describe exactly what we accept; `parse_*_response` turns a raw
//! status + body into either a validated domain value or a [`BackendError`]
//! carrying the message to show the volunteer.

use pantry_ids::PantryId;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::defaults::{DRAFT_LOAD_FALLBACK, UPLOAD_FALLBACK};
use crate::inventory::Inventory;

pub type RawInventory = BTreeMap<String, Value>;

// ============================================================================
// Wire envelopes
// ============================================================================

/// `GET /inventory/draft/{pantryId}`
#[derive(Debug, Clone, Deserialize)]
pub struct DraftEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub draft: Option<DraftBody>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftBody {
    pub pantry_id: String,
    pub inventory: RawInventory,
    #[serde(default)]
    pub files: Vec<DraftFileEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftFileEntry {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

/// `POST /upload`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub files: Vec<FileAckEntry>,
    #[serde(default)]
    pub inventory: Option<RawInventory>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileAckEntry {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// Validated domain values
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftFile {
    pub filename: Option<String>,
    pub size_bytes: u64,
}

/// Backend-computed, pre-confirmation inventory for one pantry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryDraft {
    pub pantry_id: PantryId,
    pub inventory: Inventory,
    pub files: Vec<DraftFile>,
}

impl InventoryDraft {
    /// Number of photos the draft was derived from.
    pub fn photo_count(&self) -> usize {
        self.files.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub filename: String,
    pub size_bytes: u64,
}

/// Successful answer to a batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub count: u64,
    pub files: Vec<AcceptedFile>,
    pub inventory: Option<Inventory>,
}

impl UploadOutcome {
    pub fn summary(&self) -> String {
        format!("{} file(s) received", self.count)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure talking to the backend. `Display` is the text shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// `ok: false` in a 2xx body.
    #[error("{0}")]
    Rejected(String),
    /// Non-2xx status; `message` is the backend's error or the fallback.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response from backend: {0}")]
    Malformed(String),
    #[error("{0}")]
    Transport(String),
    #[error("Backend did not respond within {0} seconds")]
    Timeout(u64),
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn failure(status: u16, error: Option<String>, fallback: &str) -> BackendError {
    let message = error
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    if is_success(status) {
        BackendError::Rejected(message)
    } else {
        BackendError::Status { status, message }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(
    status: u16,
    body: &[u8],
    fallback: &str,
) -> Result<T, BackendError> {
    serde_json::from_slice(body).map_err(|e| {
        if is_success(status) {
            BackendError::Malformed(e.to_string())
        } else {
            BackendError::Status {
                status,
                message: fallback.to_string(),
            }
        }
    })
}

/// Validate a draft response for `requested`.
pub fn parse_draft_response(
    status: u16,
    body: &[u8],
    requested: &PantryId,
) -> Result<InventoryDraft, BackendError> {
    let envelope: DraftEnvelope = decode(status, body, DRAFT_LOAD_FALLBACK)?;

    let draft = match envelope.draft {
        Some(draft) if envelope.ok && is_success(status) => draft,
        _ => return Err(failure(status, envelope.error, DRAFT_LOAD_FALLBACK)),
    };

    let pantry_id = PantryId::parse(&draft.pantry_id)
        .map_err(|e| BackendError::Malformed(format!("draft pantryId: {}", e)))?;
    if &pantry_id != requested {
        return Err(BackendError::Malformed(format!(
            "draft belongs to pantry {} instead of {}",
            pantry_id, requested
        )));
    }

    Ok(InventoryDraft {
        pantry_id,
        inventory: Inventory::from_json_map(&draft.inventory),
        files: draft
            .files
            .into_iter()
            .map(|f| DraftFile {
                filename: f.filename,
                size_bytes: f.size_bytes.unwrap_or(0),
            })
            .collect(),
    })
}

/// Validate a batch upload response.
pub fn parse_upload_response(status: u16, body: &[u8]) -> Result<UploadOutcome, BackendError> {
    let envelope: UploadEnvelope = decode(status, body, UPLOAD_FALLBACK)?;

    if !envelope.ok || !is_success(status) {
        return Err(failure(status, envelope.error, UPLOAD_FALLBACK));
    }

    let count = envelope.count.unwrap_or(envelope.files.len() as u64);
    let files = envelope
        .files
        .into_iter()
        .filter(|f| f.ok)
        .map(|f| AcceptedFile {
            filename: f.filename.unwrap_or_default(),
            size_bytes: f.size_bytes.unwrap_or(0),
        })
        .collect();

    Ok(UploadOutcome {
        count,
        files,
        inventory: envelope.inventory.as_ref().map(Inventory::from_json_map),
    })
}
