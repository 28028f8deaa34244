//! Credential storage modes
//!
//! The user directory stores whatever [`PasswordHashing::seal`] returns in
//! the record's `password` field and checks logins with
//! [`PasswordHashing::verify`].
//!
//! - [`PasswordHashing::Plaintext`] (default): the password is stored as
//!   typed and compared for exact equality. This matches records written by
//!   earlier versions of the application.
//! - [`PasswordHashing::Argon2`]: the password is stored as an Argon2id PHC
//!   string with a random salt and verified in constant time.
//!
//! # Example
//!
//! ```
//! use taskdesk_shared::auth::password::PasswordHashing;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mode = PasswordHashing::Argon2;
//! let stored = mode.seal("hunter2")?;
//! assert!(stored.starts_with("$argon2id$"));
//! assert!(mode.verify("hunter2", &stored)?);
//! assert!(!mode.verify("hunter3", &stored)?);
//! # Ok(())
//! # }
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),
}

/// How passwords are stored in user records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordHashing {
    /// Stored and compared as plain text
    #[default]
    Plaintext,

    /// Stored as salted Argon2id hashes
    Argon2,
}

impl PasswordHashing {
    /// Produces the value to store for `password`
    pub fn seal(&self, password: &str) -> Result<String, PasswordError> {
        match self {
            PasswordHashing::Plaintext => Ok(password.to_string()),
            PasswordHashing::Argon2 => hash_password(password),
        }
    }

    /// Checks `candidate` against a stored value
    ///
    /// In Argon2 mode a stored value that is not a PHC string (for example
    /// a record written in plaintext mode) never matches.
    pub fn verify(&self, candidate: &str, stored: &str) -> Result<bool, PasswordError> {
        match self {
            PasswordHashing::Plaintext => Ok(candidate == stored),
            PasswordHashing::Argon2 => match PasswordHash::new(stored) {
                Ok(parsed) => verify_hash(candidate, &parsed),
                Err(_) => {
                    tracing::warn!("Stored credential is not a PHC hash; treating as mismatch");
                    Ok(false)
                }
            },
        }
    }
}

impl fmt::Display for PasswordHashing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordHashing::Plaintext => write!(f, "plaintext"),
            PasswordHashing::Argon2 => write!(f, "argon2"),
        }
    }
}

impl FromStr for PasswordHashing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(PasswordHashing::Plaintext),
            "argon2" | "argon2id" => Ok(PasswordHashing::Argon2),
            other => Err(format!("Unknown password hashing mode: {}", other)),
        }
    }
}

/// Hashes with Argon2id (library default parameters) and a fresh salt
fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

fn verify_hash(candidate: &str, parsed: &PasswordHash<'_>) -> Result<bool, PasswordError> {
    match Argon2::default().verify_password(candidate.as_bytes(), parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_is_identity() {
        let mode = PasswordHashing::Plaintext;
        assert_eq!(mode.seal("secret").unwrap(), "secret");
        assert!(mode.verify("secret", "secret").unwrap());
        assert!(!mode.verify("Secret", "secret").unwrap());
    }

    #[test]
    fn test_argon2_roundtrip() {
        let mode = PasswordHashing::Argon2;
        let stored = mode.seal("correct horse").expect("Hash should succeed");

        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("correct horse"));
        assert!(mode.verify("correct horse", &stored).unwrap());
        assert!(!mode.verify("wrong horse", &stored).unwrap());
        assert!(!mode.verify("", &stored).unwrap());
    }

    #[test]
    fn test_argon2_uses_fresh_salts() {
        let mode = PasswordHashing::Argon2;
        let a = mode.seal("same").unwrap();
        let b = mode.seal("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_argon2_rejects_plaintext_record() {
        let mode = PasswordHashing::Argon2;
        assert!(!mode.verify("secret", "secret").unwrap());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("ARGON2".parse::<PasswordHashing>().unwrap(), PasswordHashing::Argon2);
        assert_eq!(" plaintext ".parse::<PasswordHashing>().unwrap(), PasswordHashing::Plaintext);
        assert!("bcrypt".parse::<PasswordHashing>().is_err());
        assert_eq!(PasswordHashing::default().to_string(), "plaintext");
    }
}
