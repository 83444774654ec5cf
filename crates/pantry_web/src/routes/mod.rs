pub mod assets;
pub mod auth;
pub mod home;
pub mod review;
pub mod upload;

use axum::response::Redirect;
use pantry_ids::PantryId;
use pantry_security::Session;

use crate::error::WebError;

pub(crate) fn parse_pantry(raw: &str) -> Result<PantryId, WebError> {
    Ok(PantryId::parse(raw)?)
}

/// Volunteers scoped to a pantry only see that pantry's pages.
pub(crate) fn pantry_scope_redirect(
    session: &Session,
    requested: &PantryId,
    page: &str,
) -> Option<Redirect> {
    match &session.pantry_id {
        Some(own) if own != requested => {
            tracing::info!(requested = %requested, own = %own, "Redirecting to own pantry");
            Some(Redirect::to(&format!("/{}/{}", own, page)))
        }
        _ => None,
    }
}
