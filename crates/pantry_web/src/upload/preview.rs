//! Preview handles for selected photos.
//!
//! Each accepted file gets a [`PreviewHandle`] that keeps its bytes
//! servable at `/{pantryId}/upload/preview/{previewId}`. Dropping the handle
//! releases the entry, so superseding, removing or purging a selection can
//! never leave previews behind.

use axum::body::Bytes;
use pantry_ids::{PreviewId, SessionId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

struct PreviewEntry {
    owner: SessionId,
    content_type: String,
    bytes: Bytes,
}

type Entries = Mutex<HashMap<PreviewId, PreviewEntry>>;

fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<PreviewId, PreviewEntry>> {
    entries.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Entries>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, owner: &SessionId, content_type: &str, bytes: Bytes) -> PreviewHandle {
        let id = PreviewId::new();
        lock(&self.entries).insert(
            id.clone(),
            PreviewEntry {
                owner: owner.clone(),
                content_type: content_type.to_string(),
                bytes,
            },
        );
        PreviewHandle {
            id,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Content type and bytes of a live preview owned by `owner`.
    pub fn get(&self, owner: &SessionId, id: &PreviewId) -> Option<(String, Bytes)> {
        let entries = lock(&self.entries);
        entries
            .get(id)
            .filter(|entry| &entry.owner == owner)
            .map(|entry| (entry.content_type.clone(), entry.bytes.clone()))
    }

    /// Number of previews still held.
    pub fn live(&self) -> usize {
        lock(&self.entries).len()
    }
}

/// Owns one registry entry until dropped.
pub struct PreviewHandle {
    id: PreviewId,
    entries: Weak<Entries>,
}

impl PreviewHandle {
    pub fn id(&self) -> &PreviewId {
        &self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            let released = lock(&entries).remove(&self.id);
            drop(released);
        }
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.id).finish()
    }
}
