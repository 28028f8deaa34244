use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{KeyValueStore, StoreError};

/// In-memory key-value store
///
/// Clones share the same map, so reopening services over a clone behaves
/// like a restart against the same durable storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty().unwrap());

        store.set("sesion", "{}").unwrap();
        assert_eq!(store.get("sesion").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len().unwrap(), 1);

        store.remove("sesion").unwrap();
        assert!(store.get("sesion").unwrap().is_none());

        // Removing twice is fine
        store.remove("sesion").unwrap();
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let reopened = store.clone();

        store.set("tareas", "[]").unwrap();
        assert_eq!(reopened.get("tareas").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = MemoryStore::new();
        store.set("tareas", "[]").unwrap();

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Backend(_))));
        assert!(matches!(store.is_empty(), Err(StoreError::Backend(_))));
        assert!(matches!(store.get("tareas"), Err(StoreError::Backend(_))));
    }
}
