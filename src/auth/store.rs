//! The session store.
//!
//! One [`SessionStore`] is constructed at startup and owned by the application
//! state. Every transition persists through [`AuthStorage`] and returns a
//! [`SessionChange`] describing what happened, so dependents react to the
//! returned value instead of polling.

use crate::domain::user::{Session, UserProfile};
use crate::storage::AuthStorage;

/// Notification returned by every session transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    /// A user signed in or registered.
    SignedIn,
    /// The user signed out explicitly.
    SignedOut,
    /// An authorized call was refused; the session is gone.
    Expired,
    /// The account was deleted; the session is gone.
    AccountDeleted,
}

impl SessionChange {
    /// Whether the transition ended a session.
    #[must_use]
    pub const fn is_sign_out(self) -> bool {
        !matches!(self, Self::SignedIn)
    }
}

/// Holder of the current session.
///
/// Persistence failures are logged and never block the in-memory transition:
/// a user who cannot write to disk still gets signed in (or out) for the life
/// of the plugin.
#[derive(Debug)]
pub struct SessionStore {
    storage: AuthStorage,
    session: Option<Session>,
    revision: u64,
}

impl SessionStore {
    /// Builds the store from whatever session was persisted.
    #[must_use]
    pub fn load(mut storage: AuthStorage) -> Self {
        let session = storage.load_session();
        tracing::info!(authenticated = session.is_some(), "session store loaded");
        Self {
            storage,
            session,
            revision: 0,
        }
    }

    /// Installs a session obtained from a successful login.
    pub fn login_succeeded(&mut self, session: Session) -> SessionChange {
        let _span = tracing::debug_span!("login_succeeded", user_id = %session.user.id).entered();
        self.sign_in(session)
    }

    /// Installs a session obtained from a successful registration.
    pub fn register_succeeded(&mut self, session: Session) -> SessionChange {
        let _span = tracing::debug_span!("register_succeeded", user_id = %session.user.id).entered();
        self.sign_in(session)
    }

    /// Ends the session at the user's request. No network call is involved.
    pub fn logout(&mut self) -> SessionChange {
        self.sign_out(SessionChange::SignedOut)
    }

    /// Ends the session after the backend refused its token.
    pub fn expire(&mut self) -> SessionChange {
        self.sign_out(SessionChange::Expired)
    }

    /// Ends the session after the account was deleted.
    pub fn account_deleted(&mut self) -> SessionChange {
        self.sign_out(SessionChange::AccountDeleted)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Counter bumped on every transition.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    fn sign_in(&mut self, session: Session) -> SessionChange {
        if let Err(e) = self.storage.save_session(&session) {
            tracing::error!(error = %e, "failed to persist session");
        }
        tracing::info!(username = %session.user.username, "signed in");
        self.session = Some(session);
        self.revision += 1;
        SessionChange::SignedIn
    }

    fn sign_out(&mut self, change: SessionChange) -> SessionChange {
        self.storage.clear();
        if self.session.take().is_some() {
            tracing::info!(?change, "session ended");
        }
        self.revision += 1;
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, TOKEN_KEY};

    fn session() -> Session {
        Session::new(
            "tok".into(),
            UserProfile {
                id: "1".into(),
                username: "ada".into(),
                email: "ada@example.org".into(),
                created_at: None,
            },
        )
    }

    #[test]
    fn register_authenticates_with_matching_profile() {
        let mut store = SessionStore::load(AuthStorage::new(Box::new(MemoryStore::new())));
        assert!(!store.is_authenticated());

        assert_eq!(store.register_succeeded(session()), SessionChange::SignedIn);
        assert!(store.is_authenticated());
        assert_eq!(store.user().map(|u| u.email.as_str()), Some("ada@example.org"));
        assert_eq!(store.token(), Some("tok"));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn expire_clears_memory_and_storage() {
        let mut backing = MemoryStore::new();
        backing.set(TOKEN_KEY, "tok".into()).unwrap();
        backing
            .set(crate::storage::USER_KEY, serde_json::to_string(&session().user).unwrap())
            .unwrap();

        let mut store = SessionStore::load(AuthStorage::new(Box::new(backing)));
        assert!(store.is_authenticated());

        assert_eq!(store.expire(), SessionChange::Expired);
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn every_transition_bumps_revision() {
        let mut store = SessionStore::load(AuthStorage::new(Box::new(MemoryStore::new())));
        store.login_succeeded(session());
        store.logout();
        store.logout();
        assert_eq!(store.revision(), 3);
        assert!(SessionChange::AccountDeleted.is_sign_out());
    }
}
