//! Per-session, per-pantry page state.
//!
//! Values are only touched inside short synchronous closures; nothing holds
//! the lock across an `.await`. Removed values are handed back to the caller
//! so their destructors (preview release) run after the lock is gone.

use pantry_ids::{PantryId, SessionId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub type ScopeKey = (SessionId, PantryId);

pub fn scope_key(session: &SessionId, pantry: &PantryId) -> ScopeKey {
    (session.clone(), pantry.clone())
}

pub struct ScopedStore<V> {
    entries: Mutex<HashMap<ScopeKey, V>>,
}

impl<V> Default for ScopedStore<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> ScopedStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ScopeKey, V>> {
        // a panicking handler must not wedge every other session
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the entry, creating it with `V::default()` first.
    pub fn with<R>(&self, key: &ScopeKey, f: impl FnOnce(&mut V) -> R) -> R
    where
        V: Default,
    {
        let mut entries = self.lock();
        f(entries.entry(key.clone()).or_default())
    }

    /// Run `f` only if the entry exists.
    pub fn with_existing<R>(&self, key: &ScopeKey, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.lock().get_mut(key).map(f)
    }

    /// Install `value`, returning what it superseded.
    pub fn replace(&self, key: &ScopeKey, value: V) -> Option<V> {
        self.lock().insert(key.clone(), value)
    }

    /// Remove every entry belonging to `session`.
    pub fn purge_session(&self, session: &SessionId) -> Vec<V> {
        let mut entries = self.lock();
        let keys: Vec<ScopeKey> = entries
            .keys()
            .filter(|(owner, _)| owner == session)
            .cloned()
            .collect();
        keys.iter().filter_map(|key| entries.remove(key)).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_scoped_by_session_and_pantry() {
        let store: ScopedStore<u32> = ScopedStore::new();
        let a = SessionId::new();
        let b = SessionId::new();
        let p1 = PantryId::parse("p1").unwrap();
        let p2 = PantryId::parse("p2").unwrap();

        store.with(&scope_key(&a, &p1), |v| *v = 1);
        store.with(&scope_key(&a, &p2), |v| *v = 2);
        store.with(&scope_key(&b, &p1), |v| *v = 3);

        assert_eq!(store.with_existing(&scope_key(&a, &p1), |v| *v), Some(1));
        assert_eq!(store.with_existing(&scope_key(&b, &p2), |v| *v), None);

        let mut purged = store.purge_session(&a);
        purged.sort();
        assert_eq!(purged, vec![1, 2]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_returns_previous() {
        let store: ScopedStore<&str> = ScopedStore::new();
        let key = scope_key(&SessionId::new(), &PantryId::parse("p1").unwrap());
        assert_eq!(store.replace(&key, "first"), None);
        assert_eq!(store.replace(&key, "second"), Some("first"));
    }
}
