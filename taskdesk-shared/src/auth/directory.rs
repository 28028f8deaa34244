//! User directory
//!
//! Registered users live as a JSON array under the `"usuarios"` key. The
//! list is read from the store on every call so writes made through another
//! handle are visible immediately.
//!
//! Email uniqueness is enforced only here, at registration time, by an
//! exact (case-sensitive) scan.

use std::sync::Arc;

use tracing::{debug, info};

use super::{AuthError, PasswordHashing};
use crate::models::user::User;
use crate::store::{self, KeyValueStore, USERS_KEY};

/// Registered users keyed by email
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn KeyValueStore>,
    hashing: PasswordHashing,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>, hashing: PasswordHashing) -> Self {
        UserDirectory { store, hashing }
    }

    pub fn hashing(&self) -> PasswordHashing {
        self.hashing
    }

    /// All registered users in registration order
    pub fn users(&self) -> Result<Vec<User>, AuthError> {
        Ok(store::load_json(self.store.as_ref(), USERS_KEY)?.unwrap_or_default())
    }

    /// Exact email lookup
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users()?.into_iter().find(|u| u.email == email))
    }

    /// Appends a new regular user unless the email is taken
    ///
    /// # Errors
    ///
    /// - `AuthError::AlreadyRegistered` if a user with exactly this email exists
    /// - `AuthError::Store` / `AuthError::Password` on storage or hashing failure
    pub fn add(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let mut users = self.users()?;

        if users.iter().any(|u| u.email == email) {
            debug!(email = %email, "Registration rejected: email taken");
            return Err(AuthError::AlreadyRegistered(email.to_string()));
        }

        let user = User::new(name, email, self.hashing.seal(password)?);
        users.push(user.clone());
        store::save_json(self.store.as_ref(), USERS_KEY, &users)?;

        info!(email = %email, total_users = users.len(), "User registered");
        Ok(user)
    }

    /// Finds the user whose email and password both match
    ///
    /// The error never says which of the two was wrong.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        for user in self.users()? {
            if user.email == email && self.hashing.verify(password, &user.password)? {
                return Ok(user);
            }
        }
        Err(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn directory(hashing: PasswordHashing) -> (MemoryStore, UserDirectory) {
        let store = MemoryStore::new();
        let dir = UserDirectory::new(Arc::new(store.clone()), hashing);
        (store, dir)
    }

    #[test]
    fn test_add_and_find() {
        let (_, dir) = directory(PasswordHashing::Plaintext);
        dir.add("Ana", "ana@example.com", "secret").unwrap();

        let found = dir.find_by_email("ana@example.com").unwrap().unwrap();
        assert_eq!(found.name, "Ana");
        assert_eq!(found.password, "secret");
        assert!(dir.find_by_email("ANA@example.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (_, dir) = directory(PasswordHashing::Plaintext);
        dir.add("Ana", "ana@example.com", "one").unwrap();

        let err = dir.add("Other Ana", "ana@example.com", "two").unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered(_)));
        assert_eq!(dir.users().unwrap().len(), 1);
    }

    #[test]
    fn test_email_is_case_sensitive() {
        let (_, dir) = directory(PasswordHashing::Plaintext);
        dir.add("Ana", "ana@example.com", "one").unwrap();
        dir.add("Ana", "Ana@example.com", "two").unwrap();
        assert_eq!(dir.users().unwrap().len(), 2);
    }

    #[test]
    fn test_authenticate() {
        let (_, dir) = directory(PasswordHashing::Plaintext);
        dir.add("Ana", "ana@example.com", "secret").unwrap();

        assert_eq!(dir.authenticate("ana@example.com", "secret").unwrap().name, "Ana");
        assert!(matches!(
            dir.authenticate("ana@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            dir.authenticate("nobody@example.com", "secret"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_argon2_directory_stores_no_plaintext() {
        let (store, dir) = directory(PasswordHashing::Argon2);
        dir.add("Ana", "ana@example.com", "secret").unwrap();

        let raw = store.get(USERS_KEY).unwrap().unwrap();
        assert!(!raw.contains("\"secret\""));
        assert!(dir.authenticate("ana@example.com", "secret").is_ok());
    }

    #[test]
    fn test_sees_writes_from_other_handles() {
        let (store, dir) = directory(PasswordHashing::Plaintext);
        let other = UserDirectory::new(Arc::new(store), PasswordHashing::Plaintext);

        other.add("Luis", "luis@example.com", "pw").unwrap();
        assert!(dir.find_by_email("luis@example.com").unwrap().is_some());
    }
}
