//! Persisted authentication state.
//!
//! The bearer token and the serialized user profile live under two fixed keys.
//! A session is only ever read back when both are present and the profile
//! parses; any partial state is purged on load.

use crate::domain::error::{GalleryError, Result};
use crate::domain::user::{Session, UserProfile};
use crate::storage::backend::KeyValueStore;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key of the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

/// Typed accessors for the persisted session over any [`KeyValueStore`].
pub struct AuthStorage {
    store: Box<dyn KeyValueStore>,
}

impl AuthStorage {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the persisted session.
    ///
    /// Returns `None` when nothing is stored. A token without a profile, a
    /// profile without a token, or an unparsable profile is treated as no
    /// session and removed.
    pub fn load_session(&mut self) -> Option<Session> {
        let _span = tracing::debug_span!("load_session").entered();

        let token = self.read(TOKEN_KEY);
        let user = self.read(USER_KEY);

        match (token, user) {
            (None, None) => None,
            (Some(token), Some(raw_user)) if !token.is_empty() => {
                match serde_json::from_str::<UserProfile>(&raw_user) {
                    Ok(user) => {
                        tracing::debug!(user_id = %user.id, "restored persisted session");
                        Some(Session::new(token, user))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "persisted profile unreadable, purging session");
                        self.clear();
                        None
                    }
                }
            }
            _ => {
                tracing::warn!("partial session in storage, purging");
                self.clear();
                None
            }
        }
    }

    /// Persists token and profile together.
    ///
    /// # Errors
    ///
    /// Returns an error if either value cannot be written. The token is rolled
    /// back when the profile write fails so storage never holds half a session.
    pub fn save_session(&mut self, session: &Session) -> Result<()> {
        let _span = tracing::debug_span!("save_session", user_id = %session.user.id).entered();

        let user = serde_json::to_string(&session.user)
            .map_err(|e| GalleryError::Storage(format!("failed to serialize profile: {e}")))?;

        self.store.set(TOKEN_KEY, session.token.clone())?;
        if let Err(e) = self.store.set(USER_KEY, user) {
            if let Err(rollback) = self.store.remove(TOKEN_KEY) {
                tracing::error!(error = %rollback, "failed to roll back token after profile write failed");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Removes both keys. Failures are logged and otherwise ignored.
    pub fn clear(&mut self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::error!(key, error = %e, "failed to remove persisted key");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to read persisted key");
                None
            }
        }
    }
}

impl std::fmt::Debug for AuthStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStorage").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::MemoryStore;

    fn profile() -> UserProfile {
        UserProfile {
            id: "7".into(),
            username: "ada".into(),
            email: "ada@example.org".into(),
            created_at: None,
        }
    }

    /// Refuses every write of the profile key, and optionally every removal.
    struct ProfileWriteFails {
        inner: MemoryStore,
        removals_fail: bool,
    }

    impl KeyValueStore for ProfileWriteFails {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<()> {
            if key == USER_KEY {
                return Err(GalleryError::Storage("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            if self.removals_fail {
                return Err(GalleryError::Storage("read-only".into()));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_profile_write_rolls_back_token() {
        let store = ProfileWriteFails { inner: MemoryStore::new(), removals_fail: false };
        let mut storage = AuthStorage::new(Box::new(store));

        let err = storage.save_session(&Session::new("tok".into(), profile())).unwrap_err();
        assert!(matches!(err, GalleryError::Storage(ref msg) if msg == "disk full"));
        assert!(storage.read(TOKEN_KEY).is_none());
    }

    #[test]
    fn failed_rollback_still_reports_profile_error() {
        let store = ProfileWriteFails { inner: MemoryStore::new(), removals_fail: true };
        let mut storage = AuthStorage::new(Box::new(store));

        let err = storage.save_session(&Session::new("tok".into(), profile())).unwrap_err();
        assert!(matches!(err, GalleryError::Storage(ref msg) if msg == "disk full"));
        // The orphaned token alone never loads as a session.
        assert!(storage.load_session().is_none());
    }

    #[test]
    fn saved_session_loads_back() {
        let mut storage = AuthStorage::new(Box::new(MemoryStore::new()));
        let session = Session::new("tok".into(), profile());
        storage.save_session(&session).unwrap();
        assert_eq!(storage.load_session(), Some(session));
    }

    #[test]
    fn token_without_user_is_purged() {
        let mut store = MemoryStore::new();
        store.set(TOKEN_KEY, "tok".into()).unwrap();
        let mut storage = AuthStorage::new(Box::new(store));

        assert!(storage.load_session().is_none());
        assert!(storage.read(TOKEN_KEY).is_none());
    }

    #[test]
    fn unreadable_profile_is_purged() {
        let mut store = MemoryStore::new();
        store.set(TOKEN_KEY, "tok".into()).unwrap();
        store.set(USER_KEY, "not json".into()).unwrap();
        let mut storage = AuthStorage::new(Box::new(store));

        assert!(storage.load_session().is_none());
        assert!(storage.read(USER_KEY).is_none());
        assert!(storage.read(TOKEN_KEY).is_none());
    }
}
