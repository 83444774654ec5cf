//! Handoff buffer.
//!
//! A small key/value slot store per session, standing in for the tab's
//! transient storage. The review page writes the prepared payload under
//! [`HANDOFF_STORAGE_KEY`]; a later write replaces it.

use pantry_ids::SessionId;
use pantry_protocol::defaults::HANDOFF_STORAGE_KEY;
use pantry_protocol::HandoffPayload;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type Slots = HashMap<SessionId, HashMap<String, String>>;

#[derive(Default)]
pub struct HandoffStore {
    slots: Mutex<Slots>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_item(&self, session: &SessionId, key: &str, value: String) {
        self.lock()
            .entry(session.clone())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn get_item(&self, session: &SessionId, key: &str) -> Option<String> {
        self.lock()
            .get(session)
            .and_then(|slots| slots.get(key))
            .cloned()
    }

    pub fn clear_session(&self, session: &SessionId) {
        self.lock().remove(session);
    }

    /// Serialize `payload` into the handoff slot, replacing what was there.
    pub fn write_payload(
        &self,
        session: &SessionId,
        payload: &HandoffPayload,
    ) -> serde_json::Result<()> {
        let json = payload.to_json()?;
        self.set_item(session, HANDOFF_STORAGE_KEY, json);
        Ok(())
    }

    pub fn read_payload(&self, session: &SessionId) -> Option<String> {
        self.get_item(session, HANDOFF_STORAGE_KEY)
    }
}
