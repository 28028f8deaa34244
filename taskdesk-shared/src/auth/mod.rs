//! Authentication: user directory, session and the service tying them together
//!
//! # Modules
//!
//! - [`password`]: credential storage modes (plaintext or Argon2id)
//! - [`directory`]: registered users, keyed by email
//! - [`session`]: the single current-user snapshot
//! - [`service`]: async register/login with artificial latency
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskdesk_shared::auth::{AuthService, AuthSettings};
//! use taskdesk_shared::store::MemoryStore;
//!
//! # async fn example() -> Result<(), taskdesk_shared::auth::AuthError> {
//! let mut auth = AuthService::load(Arc::new(MemoryStore::new()), AuthSettings::default())?;
//!
//! auth.register("Ana", "ana@example.com", "secret").await?;
//! let user = auth.login("ana@example.com", "secret").await?;
//! assert!(auth.is_authenticated());
//! println!("Welcome, {}", user.name);
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod password;
pub mod service;
pub mod session;

pub use directory::UserDirectory;
pub use password::{PasswordError, PasswordHashing};
pub use service::{AuthService, AuthSettings, DEFAULT_AUTH_LATENCY};
pub use session::SessionManager;

use crate::store::StoreError;

/// Authentication error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration with an email that already exists
    #[error("Email is already registered: {0}")]
    AlreadyRegistered(String),

    /// No user matches the email/password pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Reading or writing the user list or session failed
    #[error("Auth storage error: {0}")]
    Store(#[from] StoreError),

    /// Hashing or verifying a credential failed
    #[error(transparent)]
    Password(#[from] PasswordError),
}
