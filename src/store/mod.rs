//! Key/value storage with browser local-storage semantics.
//!
//! Values are strings, writes may fail with [`StoreError::QuotaExceeded`], and
//! every mutation can be observed as a storage-change event (with the
//! `emitter` feature). Product reviews live under one key per product; see
//! [`ProductReviewStore`].
//!
//! ## Example
//!
//! ```ignore
//! use hive_reviews::{InMemoryStore, KeyValueStore};
//!
//! let store = InMemoryStore::with_quota(5 * 1024 * 1024);
//! store.set("productReviews_3", blob_json)?;
//! let raw = store.get("productReviews_3")?;
//! ```

mod in_memory;
mod product;

use crate::error::StoreError;

pub use in_memory::InMemoryStore;
pub use product::ProductReviewStore;

/// Event name used for storage-change notifications.
pub const STORAGE_EVENT: &str = "storage";

/// Abstract string key/value storage.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`. Returns None if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// All keys currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }
}
