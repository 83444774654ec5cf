//! Server-side record of the sessions that hold page state.
//!
//! Session tokens are stateless, so the ledger is what bounds the in-memory
//! stores by a session's lifetime. The gate records every session it lets
//! through; sign-out moves the session to the revoked set, where it stays
//! until its token would have expired anyway. [`SessionLedger::take_expired`]
//! hands back sessions whose tokens are past expiry so their state can be
//! purged.

use chrono::{DateTime, Utc};
use pantry_ids::SessionId;
use pantry_security::Session;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Ledger {
    live: HashMap<SessionId, DateTime<Utc>>,
    revoked: HashMap<SessionId, DateTime<Utc>>,
}

#[derive(Default)]
pub struct SessionLedger {
    inner: Mutex<Ledger>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Note that `session` is in use.
    pub fn touch(&self, session: &Session) {
        self.lock()
            .live
            .insert(session.session_id.clone(), session.expires_at);
    }

    /// Refuse `session` from now on, until its token expires.
    pub fn revoke(&self, session: &Session) {
        let mut ledger = self.lock();
        ledger.live.remove(&session.session_id);
        ledger
            .revoked
            .insert(session.session_id.clone(), session.expires_at);
    }

    pub fn is_revoked(&self, session: &SessionId) -> bool {
        self.lock().revoked.contains_key(session)
    }

    /// Forget sessions whose tokens expired at or before `now` and return
    /// them, live or revoked. A request admitted just before sign-out may
    /// have left state behind a revoked session.
    pub fn take_expired(&self, now: DateTime<Utc>) -> Vec<SessionId> {
        let mut guard = self.lock();
        let ledger = &mut *guard;
        let mut expired = Vec::new();
        for entries in [&mut ledger.live, &mut ledger.revoked] {
            entries.retain(|id, expires_at| {
                let keep = *expires_at > now;
                if !keep {
                    expired.push(id.clone());
                }
                keep
            });
        }
        expired
    }

    /// Sessions currently tracked as live.
    pub fn live(&self) -> usize {
        self.lock().live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            user_id: "1".to_string(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            pantry_id: None,
            session_id: SessionId::new(),
            expires_at,
        }
    }

    #[test]
    fn test_expired_sessions_are_taken_once() {
        let ledger = SessionLedger::new();
        let now = Utc::now();
        let old = session(now - Duration::seconds(1));
        let fresh = session(now + Duration::hours(1));
        ledger.touch(&old);
        ledger.touch(&fresh);

        assert_eq!(ledger.take_expired(now), vec![old.session_id.clone()]);
        assert!(ledger.take_expired(now).is_empty());
        assert_eq!(ledger.live(), 1);
    }

    #[test]
    fn test_revoked_until_expiry() {
        let ledger = SessionLedger::new();
        let now = Utc::now();
        let signed_out = session(now + Duration::minutes(5));
        ledger.touch(&signed_out);
        ledger.revoke(&signed_out);

        assert!(ledger.is_revoked(&signed_out.session_id));
        assert_eq!(ledger.live(), 0);
        assert!(ledger.take_expired(now).is_empty());
        assert!(ledger.is_revoked(&signed_out.session_id));

        assert_eq!(
            ledger.take_expired(now + Duration::minutes(5)),
            vec![signed_out.session_id.clone()]
        );
        assert!(!ledger.is_revoked(&signed_out.session_id));
    }
}
