//! Review workflow: load a pantry's draft, edit it, prepare a handoff.

pub mod state;

pub use state::{DraftReview, EditOutcome, ReviewState};

use crate::scoped::ScopedStore;

/// One review page instance per session and pantry; a fresh page load
/// replaces it.
pub type ReviewStore = ScopedStore<ReviewState>;
