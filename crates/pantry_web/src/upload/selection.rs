//! The photos a volunteer has picked but not necessarily sent.

use axum::body::Bytes;
use pantry_ids::{PreviewId, SessionId};
use pantry_protocol::UploadOutcome;

use super::preview::{PreviewHandle, PreviewRegistry};

/// One file as received from the browser.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// Outcome of the most recent submit, kept until the next one starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Accepted(UploadOutcome),
    Failed(String),
}

/// Files and their previews are parallel lists, always the same length.
#[derive(Debug, Default)]
pub struct UploadSelection {
    files: Vec<SelectedFile>,
    previews: Vec<PreviewHandle>,
    pub(crate) submitting: bool,
    pub(crate) last_result: Option<UploadResult>,
}

/// Render-ready copy of a selection.
#[derive(Debug, Clone, Default)]
pub struct UploadView {
    pub files: Vec<SelectedFileView>,
    pub submitting: bool,
    pub last_result: Option<UploadResult>,
}

#[derive(Debug, Clone)]
pub struct SelectedFileView {
    pub filename: String,
    pub size_bytes: u64,
    pub preview_id: PreviewId,
}

impl UploadSelection {
    /// Replace the selection with the image files among `candidates`.
    ///
    /// An empty candidate list changes nothing. Returns the superseded
    /// preview handles; dropping them releases the previews.
    pub fn select(
        &mut self,
        candidates: Vec<SelectedFile>,
        registry: &PreviewRegistry,
        owner: &SessionId,
    ) -> Vec<PreviewHandle> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let files: Vec<SelectedFile> = candidates.into_iter().filter(|f| f.is_image()).collect();
        let previews = files
            .iter()
            .map(|f| registry.acquire(owner, &f.content_type, f.bytes.clone()))
            .collect();

        self.files = files;
        std::mem::replace(&mut self.previews, previews)
    }

    /// Remove the file at `index` together with its preview.
    pub fn remove(&mut self, index: usize) -> Option<(SelectedFile, PreviewHandle)> {
        if index >= self.files.len() {
            return None;
        }
        Some((self.files.remove(index), self.previews.remove(index)))
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn preview_ids(&self) -> impl Iterator<Item = &PreviewId> {
        self.previews.iter().map(PreviewHandle::id)
    }

    pub fn holds_preview(&self, id: &PreviewId) -> bool {
        self.preview_ids().any(|held| held == id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_result(&self) -> Option<&UploadResult> {
        self.last_result.as_ref()
    }

    pub fn view(&self) -> UploadView {
        UploadView {
            files: self
                .files
                .iter()
                .zip(&self.previews)
                .map(|(file, preview)| SelectedFileView {
                    filename: file.filename.clone(),
                    size_bytes: file.size_bytes(),
                    preview_id: preview.id().clone(),
                })
                .collect(),
            submitting: self.submitting,
            last_result: self.last_result.clone(),
        }
    }
}
