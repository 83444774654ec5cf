use axum::http::header::HOST;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use pantry_ids::SessionId;
use pantry_security::{CredentialVerifier, SessionKeys};
use std::sync::Arc;
use url::Url;

use crate::backend::BackendClient;
use crate::config::RuntimeConfig;
use crate::error::WebError;
use crate::handoff::HandoffStore;
use crate::review::ReviewStore;
use crate::sessions::SessionLedger;
use crate::upload::{PreviewRegistry, UploadStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RuntimeConfig>,
    pub sessions: Arc<SessionKeys>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub backend: BackendClient,
    pub previews: PreviewRegistry,
    pub uploads: Arc<UploadStore>,
    pub reviews: Arc<ReviewStore>,
    pub handoff: Arc<HandoffStore>,
    pub ledger: Arc<SessionLedger>,
}

impl AppState {
    pub fn new(
        config: RuntimeConfig,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Result<Self, WebError> {
        let sessions = SessionKeys::new(&config.session_secret, config.session_max_age);
        let backend = BackendClient::new(
            config.api_url.clone(),
            config.request_timeout,
            config.connect_timeout,
        )?;

        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            credentials,
            backend,
            previews: PreviewRegistry::new(),
            uploads: Arc::new(UploadStore::new()),
            reviews: Arc::new(ReviewStore::new()),
            handoff: Arc::new(HandoffStore::new()),
            ledger: Arc::new(SessionLedger::new()),
        })
    }

    /// Origin this request was addressed to: the configured public URL,
    /// else the `Host` header, else the bind address.
    pub fn origin(&self, headers: &HeaderMap) -> Url {
        if let Some(public) = &self.config.public_url {
            return public.clone();
        }
        headers
            .get(HOST)
            .and_then(|host| host.to_str().ok())
            .and_then(|host| Url::parse(&format!("http://{}", host)).ok())
            .filter(|url| url.path() == "/" && url.username().is_empty())
            .unwrap_or_else(|| self.config.default_origin.clone())
    }

    /// Drop everything held for a session: selections (releasing their
    /// previews), review pages and the handoff buffer.
    pub fn purge_session(&self, session: &SessionId) {
        let uploads = self.uploads.purge_session(session);
        let reviews = self.reviews.purge_session(session);
        self.handoff.clear_session(session);
        tracing::debug!(
            session_id = %session,
            selections = uploads.len(),
            reviews = reviews.len(),
            "Purged session state"
        );
    }

    /// Purge the state of every session whose token expired by `now`.
    /// Returns how many sessions were purged.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let expired = self.ledger.take_expired(now);
        for session in &expired {
            self.purge_session(session);
        }
        if !expired.is_empty() {
            tracing::info!(sessions = expired.len(), "Released state of expired sessions");
        }
        expired.len()
    }
}
