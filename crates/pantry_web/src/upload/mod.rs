//! Upload workflow: pick photos, preview them, send them as one batch.

pub mod preview;
pub mod selection;
pub mod store;

pub use preview::{PreviewHandle, PreviewRegistry};
pub use selection::{SelectedFile, SelectedFileView, UploadResult, UploadSelection, UploadView};
pub use store::{InFlight, SubmitRefused, UploadStore};
