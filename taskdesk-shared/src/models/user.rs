//! User model
//!
//! Users are created on registration and never mutated or deleted. The
//! email address is the unique key and is compared case-sensitively, exactly
//! as stored.
//!
//! # Stored format
//!
//! ```json
//! {
//!   "nombre": "Ana",
//!   "email": "ana@example.com",
//!   "password": "secret",
//!   "rol": "usuario",
//!   "fecha_registro": "2024-03-01T10:00:00.000Z"
//! }
//! ```
//!
//! The `password` field holds either the plaintext password or an Argon2id
//! PHC string, depending on the configured
//! [`PasswordHashing`](crate::auth::password::PasswordHashing) mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::timestamp_now;

/// User role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    /// Default role assigned at registration
    #[default]
    #[serde(rename = "usuario")]
    Regular,

    /// Administrative user
    #[serde(rename = "admin")]
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Regular => "usuario",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    #[serde(rename = "nombre")]
    pub name: String,

    /// Email address (unique key)
    pub email: String,

    /// Stored credential (plaintext or PHC hash)
    pub password: String,

    /// Role
    #[serde(rename = "rol", default)]
    pub role: UserRole,

    /// When the user registered
    #[serde(rename = "fecha_registro")]
    pub registered_at: DateTime<Utc>,
}

impl User {
    /// Builds a regular user registered now
    ///
    /// `password` is stored as given; hashing happens at the directory
    /// boundary before this is called.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        User {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: UserRole::Regular,
            registered_at: timestamp_now(),
        }
    }
}
