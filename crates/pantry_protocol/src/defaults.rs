//! Canonical default values shared across the frontend crates.

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;
/// 30 days.
pub const DEFAULT_SESSION_MAX_AGE_SECS: u32 = 30 * 24 * 60 * 60;
pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 60;

/// Transient storage slot the review page writes for a teammate.
pub const HANDOFF_STORAGE_KEY: &str = "inventoryReviewHandoff";
pub const HANDOFF_SOURCE: &str = "volunteer-review";

pub const DRAFT_LOAD_FALLBACK: &str = "Could not load inventory draft from backend.";
pub const UPLOAD_FALLBACK: &str = "Upload failed";
