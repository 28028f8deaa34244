//! Persistent key-value storage
//!
//! Everything TaskDesk remembers lives in a string-keyed store whose values
//! are JSON text. Three keys are in use:
//!
//! | Key | Value |
//! |-----|-------|
//! | [`USERS_KEY`] (`"usuarios"`) | array of user records |
//! | [`SESSION_KEY`] (`"sesion"`) | a single user snapshot, or absent |
//! | [`TASKS_KEY`] (`"tareas"`) | array of task records |
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local map, cloneable handle (tests, ephemeral runs)
//! - [`FileStore`]: one `<key>.json` file per key under a data directory
//!
//! # Example
//!
//! ```
//! use taskdesk_shared::store::{self, MemoryStore};
//!
//! # fn example() -> Result<(), taskdesk_shared::store::StoreError> {
//! let store = MemoryStore::new();
//! store::save_json(&store, "answer", &42)?;
//!
//! let answer: Option<i32> = store::load_json(&store, "answer")?;
//! assert_eq!(answer, Some(42));
//! # Ok(())
//! # }
//! ```

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};

/// Key holding the registered user list
pub const USERS_KEY: &str = "usuarios";

/// Key holding the active session snapshot
pub const SESSION_KEY: &str = "sesion";

/// Key holding the task collection
pub const TASKS_KEY: &str = "tareas";

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying file or device failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value is not valid JSON for the expected type
    #[error("Failed to (de)serialize stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key cannot be mapped onto the backend
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Durable string-keyed store
///
/// Implementations use interior mutability so one handle can be shared
/// between the auth service and the task repository.
pub trait KeyValueStore: Send + Sync {
    /// Reads the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reads and deserializes the JSON value under `key`
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes `value` as JSON and stores it under `key`
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
