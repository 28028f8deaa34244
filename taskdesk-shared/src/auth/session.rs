//! Session manager
//!
//! Holds at most one current user. The session is a *snapshot*: a copy of
//! the user record taken at login and persisted under `"sesion"`. Later
//! changes to the stored user record do not reach it.

use std::sync::Arc;

use tracing::{debug, info};

use super::AuthError;
use crate::models::user::User;
use crate::store::{self, KeyValueStore, SESSION_KEY};

/// Current-user snapshot backed by the `"sesion"` record
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    current: Option<User>,
}

impl SessionManager {
    /// Creates an empty session; call [`restore`](Self::restore) to load
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        SessionManager {
            store,
            current: None,
        }
    }

    /// Rebuilds the session from storage, if a record is present
    ///
    /// Returns whether a session is active afterwards.
    pub fn restore(&mut self) -> Result<bool, AuthError> {
        self.current = store::load_json(self.store.as_ref(), SESSION_KEY)?;
        if let Some(user) = &self.current {
            debug!(email = %user.email, "Session restored");
        }
        Ok(self.current.is_some())
    }

    /// Starts a session for `user` and persists the snapshot
    pub fn begin(&mut self, user: User) -> Result<&User, AuthError> {
        store::save_json(self.store.as_ref(), SESSION_KEY, &user)?;
        info!(email = %user.email, "Session started");
        Ok(&*self.current.insert(user))
    }

    /// Clears the session and removes its persisted record
    pub fn end(&mut self) -> Result<(), AuthError> {
        self.store.remove(SESSION_KEY)?;
        if let Some(user) = self.current.take() {
            info!(email = %user.email, "Session ended");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_begin_restore_end() {
        let store = MemoryStore::new();
        let mut session = SessionManager::new(Arc::new(store.clone()));
        assert!(!session.restore().unwrap());

        let user = User::new("Ana", "ana@example.com", "secret");
        session.begin(user.clone()).unwrap();
        assert!(session.is_active());

        // A second manager over the same store sees the snapshot
        let mut restarted = SessionManager::new(Arc::new(store.clone()));
        assert!(restarted.restore().unwrap());
        assert_eq!(restarted.current(), Some(&user));

        restarted.end().unwrap();
        assert!(!restarted.is_active());
        assert!(store.get(SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn test_end_without_session() {
        let mut session = SessionManager::new(Arc::new(MemoryStore::new()));
        session.end().unwrap();
        assert!(session.current().is_none());
    }

    #[test]
    fn test_restore_corrupt_record_fails() {
        let store = MemoryStore::new();
        store.set(SESSION_KEY, "garbage").unwrap();

        let mut session = SessionManager::new(Arc::new(store));
        assert!(matches!(session.restore(), Err(AuthError::Store(_))));
    }
}
