//! Session state holder with change notification.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Identity returned by the backend's `/v1/auth/me` endpoint.
///
/// Replaced wholesale on each successful verification, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_name: String,
    pub email: String,
}

/// The current authentication verdict plus identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<User>,
}

/// Value holder for the current [`Session`].
///
/// Purely a store: no validation happens here. `set` and `clear` replace the
/// whole session atomically, so `authenticated` and `user` can never disagree.
/// Clones share the same underlying session; construct a fresh store per
/// server-rendered request to keep sessions request-scoped.
#[derive(Clone, Debug)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store in the unauthenticated state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());

        Self { tx: Arc::new(tx) }
    }

    /// Mark the session authenticated with the given identity.
    pub fn set(&self, user: User) {
        self.tx.send_replace(Session {
            authenticated: true,
            user: Some(user),
        });
    }

    /// Mark the session unauthenticated, dropping the identity.
    pub fn clear(&self) {
        self.tx.send_replace(Session::default());
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Receiver notified whenever the session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn user() -> User {
        User {
            user_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_starts_unauthenticated() {
        let store = SessionStore::new();

        let session = store.current();
        assert!(!session.authenticated);
        assert!(session.user.is_none());
    }

    #[test]
    fn test_set_then_clear_is_atomic() {
        let store = SessionStore::new();

        store.set(user());
        let session = store.current();
        assert!(session.authenticated);
        assert_eq!(session.user.as_ref().map(|u| u.email.as_str()), Some("alice@example.com"));

        store.clear();
        let session = store.current();
        assert!(!session.authenticated);
        assert!(session.user.is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let observer = store.clone();

        store.set(user());

        assert!(observer.current().authenticated);
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() -> Result<()> {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.set(user());

        rx.changed().await?;
        assert!(rx.borrow().authenticated);

        store.clear();

        rx.changed().await?;
        assert!(!rx.borrow().authenticated);

        Ok(())
    }
}
