//! InMemoryStore - HashMap-backed key/value store for tests and embedding.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[cfg(feature = "emitter")]
use std::sync::Mutex;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

use super::KeyValueStore;
#[cfg(feature = "emitter")]
use super::STORAGE_EVENT;
use crate::error::StoreError;

/// In-memory key/value store backed by a HashMap.
///
/// An optional quota caps the total size of keys plus values in bytes, the way
/// browsers cap local storage. Clone-friendly via Arc; clones share data,
/// quota and listeners.
#[derive(Clone)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
    #[cfg(feature = "emitter")]
    events: Arc<Mutex<EventEmitter>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store without a quota.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            quota: None,
            #[cfg(feature = "emitter")]
            events: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Create an empty store that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> Result<usize, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(entries.iter().map(|(k, v)| k.len() + v.len()).sum())
    }

    /// Register a listener for storage-change events. The listener receives
    /// the changed key and runs on the emitter's own thread.
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&self, listener: F) -> Result<(), StoreError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut events = self
            .events
            .lock()
            .map_err(|_| StoreError::LockPoisoned("event listeners"))?;
        events.on(STORAGE_EVENT, listener);
        Ok(())
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, key: &str) {
        match self.events.lock() {
            Ok(mut events) => {
                events.emit(STORAGE_EVENT, key.to_string());
            }
            Err(_) => tracing::warn!(key, "storage event listeners poisoned"),
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _key: &str) {}
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        {
            let mut entries = self
                .entries
                .write()
                .map_err(|_| StoreError::LockPoisoned("write"))?;

            if let Some(quota) = self.quota {
                let used_elsewhere: usize = entries
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                let needed = key.len() + value.len();
                let available = quota.saturating_sub(used_elsewhere);
                if needed > available {
                    return Err(StoreError::QuotaExceeded {
                        key: key.to_string(),
                        needed,
                        available,
                    });
                }
            }

            entries.insert(key.to_string(), value);
        }
        self.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let existed = {
            let mut entries = self
                .entries
                .write()
                .map_err(|_| StoreError::LockPoisoned("remove"))?;
            entries.remove(key).is_some()
        };
        if existed {
            self.notify(key);
        }
        Ok(existed)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned("keys"))?;
        Ok(entries.keys().cloned().collect())
    }
}
