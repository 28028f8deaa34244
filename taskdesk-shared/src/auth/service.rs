//! Authentication service
//!
//! Combines the [`UserDirectory`] and the [`SessionManager`]. Registration
//! and login wait for a configurable artificial latency before doing any
//! work; the remaining operations are immediate.
//!
//! # Flow
//!
//! ```text
//! register ──> (latency) ──> directory.add ──> Ok(user)      [no login]
//! login    ──> (latency) ──> directory.authenticate ──> session.begin
//! logout   ──> session.end
//! load     ──> session.restore
//! ```
//!
//! Both async operations take `&mut self`, so a second submission cannot
//! start on the same service while one is still waiting.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{AuthError, PasswordHashing, SessionManager, UserDirectory};
use crate::models::user::User;
use crate::store::KeyValueStore;

/// Delay applied to register and login by default
pub const DEFAULT_AUTH_LATENCY: Duration = Duration::from_millis(500);

/// Authentication settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    /// Artificial delay before register/login resolve
    pub latency: Duration,

    /// How credentials are stored and checked
    pub hashing: PasswordHashing,
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            latency: DEFAULT_AUTH_LATENCY,
            hashing: PasswordHashing::default(),
        }
    }
}

impl AuthSettings {
    /// Settings without artificial latency
    pub fn immediate() -> Self {
        AuthSettings {
            latency: Duration::ZERO,
            ..Default::default()
        }
    }

    pub fn with_hashing(mut self, hashing: PasswordHashing) -> Self {
        self.hashing = hashing;
        self
    }
}

/// User directory plus current session
pub struct AuthService {
    directory: UserDirectory,
    session: SessionManager,
    latency: Duration,
}

impl AuthService {
    /// Builds the service and restores any persisted session
    pub fn load(store: Arc<dyn KeyValueStore>, settings: AuthSettings) -> Result<Self, AuthError> {
        let mut service = AuthService {
            directory: UserDirectory::new(store.clone(), settings.hashing),
            session: SessionManager::new(store),
            latency: settings.latency,
        };
        service.restore_session()?;
        Ok(service)
    }

    /// Registers a new user; does not log them in
    ///
    /// # Errors
    ///
    /// `AuthError::AlreadyRegistered` if the email is taken.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        self.simulate_latency().await;
        self.directory.add(name, email, password)
    }

    /// Logs in with an exact email/password match
    ///
    /// On success the session is set to a snapshot of the stored record and
    /// persisted. On failure the current session is left untouched.
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidCredentials` when no record matches.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        self.simulate_latency().await;

        let user = match self.directory.authenticate(email, password) {
            Ok(user) => user,
            Err(AuthError::InvalidCredentials) => {
                warn!(email = %email, "Login failed");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        Ok(self.session.begin(user)?.clone())
    }

    /// Ends the current session (no-op when logged out)
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.session.end()
    }

    /// Reloads the session snapshot from storage
    pub fn restore_session(&mut self) -> Result<bool, AuthError> {
        self.session.restore()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_active()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// All registered users (e.g. to pick an assignee)
    pub fn users(&self) -> Result<Vec<User>, AuthError> {
        self.directory.users()
    }

    pub fn find_user(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.directory.find_by_email(email)
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            debug!(latency_ms = self.latency.as_millis() as u64, "Simulating auth latency");
            tokio::time::sleep(self.latency).await;
        }
    }
}
