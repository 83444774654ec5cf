use pantry_ids::SessionId;
use std::sync::Arc;

use super::selection::{SelectedFile, UploadResult, UploadSelection};
use crate::scoped::{ScopeKey, ScopedStore};

/// Why a submit did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRefused {
    Empty,
    AlreadyInFlight,
}

#[derive(Default)]
pub struct UploadStore {
    selections: ScopedStore<UploadSelection>,
}

impl UploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, key: &ScopeKey, f: impl FnOnce(&mut UploadSelection) -> R) -> R {
        self.selections.with(key, f)
    }

    /// Mark the selection as in flight and hand out the files to send.
    ///
    /// The returned guard clears the in-flight flag when dropped, on every
    /// path out of the submit.
    pub fn begin_submit(
        self: &Arc<Self>,
        key: &ScopeKey,
    ) -> Result<(InFlight, Vec<SelectedFile>), SubmitRefused> {
        let files = self.selections.with(key, |selection| {
            if selection.submitting {
                return Err(SubmitRefused::AlreadyInFlight);
            }
            if selection.is_empty() {
                return Err(SubmitRefused::Empty);
            }
            selection.submitting = true;
            selection.last_result = None;
            Ok(selection.files().to_vec())
        })?;

        Ok((
            InFlight {
                store: Arc::clone(self),
                key: key.clone(),
            },
            files,
        ))
    }

    pub fn purge_session(&self, session: &SessionId) -> Vec<UploadSelection> {
        self.selections.purge_session(session)
    }

    /// True when no session holds a selection.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

#[must_use = "dropping the guard ends the submit"]
pub struct InFlight {
    store: Arc<UploadStore>,
    key: ScopeKey,
}

impl InFlight {
    /// Record the outcome and end the submit.
    pub fn finish(self, result: UploadResult) {
        self.store.selections.with_existing(&self.key, |selection| {
            selection.last_result = Some(result);
            selection.submitting = false;
        });
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.store.selections.with_existing(&self.key, |selection| {
            selection.submitting = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoped::scope_key;
    use crate::upload::preview::PreviewRegistry;
    use axum::body::Bytes;
    use pantry_ids::PantryId;

    fn key() -> ScopeKey {
        scope_key(&SessionId::new(), &PantryId::parse("p123").unwrap())
    }

    fn select_one(store: &UploadStore, key: &ScopeKey, registry: &PreviewRegistry) {
        store.with(key, |selection| {
            selection.select(
                vec![SelectedFile {
                    filename: "shelf.jpg".to_string(),
                    content_type: "image/jpeg".to_string(),
                    bytes: Bytes::from_static(b"jpeg"),
                }],
                registry,
                &key.0,
            )
        });
    }

    #[test]
    fn test_empty_selection_refused() {
        let store = Arc::new(UploadStore::new());
        assert_eq!(store.begin_submit(&key()).err(), Some(SubmitRefused::Empty));
    }

    #[test]
    fn test_second_submit_refused_while_in_flight() {
        let store = Arc::new(UploadStore::new());
        let registry = PreviewRegistry::new();
        let key = key();
        select_one(&store, &key, &registry);

        let (guard, files) = store.begin_submit(&key).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(store.begin_submit(&key).err(), Some(SubmitRefused::AlreadyInFlight));

        drop(guard);
        assert!(!store.with(&key, |s| s.is_submitting()));
        assert!(store.begin_submit(&key).is_ok());
    }

    #[test]
    fn test_finish_records_result_and_keeps_selection() {
        let store = Arc::new(UploadStore::new());
        let registry = PreviewRegistry::new();
        let key = key();
        select_one(&store, &key, &registry);

        let (guard, _) = store.begin_submit(&key).unwrap();
        guard.finish(UploadResult::Failed("Upload failed".to_string()));

        store.with(&key, |selection| {
            assert!(!selection.is_submitting());
            assert_eq!(selection.len(), 1);
            assert_eq!(
                selection.last_result(),
                Some(&UploadResult::Failed("Upload failed".to_string()))
            );
        });
    }
}
