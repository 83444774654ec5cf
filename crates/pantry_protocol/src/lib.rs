//! Pantry review protocol types.
//!
//! - **inventory**: fixed category set and quantity coercion
//! - **http_types**: backend envelopes, validation and [`BackendError`]
//! - **handoff**: payload written for a teammate after review

pub mod defaults;
pub mod handoff;
pub mod http_types;
pub mod inventory;

pub use handoff::HandoffPayload;
pub use http_types::{
    parse_draft_response, parse_upload_response, AcceptedFile, BackendError, DraftFile,
    InventoryDraft, UploadOutcome,
};
pub use inventory::{
    coerce_quantity, is_known_category, parse_quantity_input, Inventory, Quantity, CATEGORIES,
};
