//! ProductReviewStore - one review blob per product.

use super::KeyValueStore;
use crate::error::StoreError;
use crate::model::ReviewBlob;

/// Typed access to the per-product review blobs of a [`KeyValueStore`].
///
/// Storage key is `"<prefix><productId>"`, `productReviews_3` by default.
#[derive(Clone)]
pub struct ProductReviewStore<S> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> ProductReviewStore<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn key_for(&self, product_id: u64) -> String {
        format!("{}{}", self.prefix, product_id)
    }

    /// Product id encoded in `key`, if it is a product blob key.
    pub fn product_id_of(&self, key: &str) -> Option<u64> {
        key.strip_prefix(&self.prefix)?.parse().ok()
    }

    /// The raw blob text for a product.
    pub fn read_raw(&self, product_id: u64) -> Result<Option<String>, StoreError> {
        self.store.get(&self.key_for(product_id))
    }

    /// Read and parse a product blob. Malformed JSON is a `StoreError::Serde`.
    pub fn read(&self, product_id: u64) -> Result<Option<ReviewBlob>, StoreError> {
        match self.read_raw(product_id)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn write_raw(&self, product_id: u64, raw: String) -> Result<(), StoreError> {
        self.store.set(&self.key_for(product_id), raw)
    }

    pub fn write(&self, product_id: u64, blob: &ReviewBlob) -> Result<(), StoreError> {
        self.write_raw(product_id, serde_json::to_string(blob)?)
    }

    pub fn remove(&self, product_id: u64) -> Result<bool, StoreError> {
        self.store.remove(&self.key_for(product_id))
    }

    /// Ids of every product that has a blob, ascending.
    pub fn product_ids(&self) -> Result<Vec<u64>, StoreError> {
        let mut ids: Vec<u64> = self
            .store
            .keys_with_prefix(&self.prefix)?
            .iter()
            .filter_map(|key| self.product_id_of(key))
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Remove every product blob except `keep`. Returns how many were removed.
    pub fn purge_except(&self, keep: u64) -> Result<usize, StoreError> {
        let mut removed = 0;
        for id in self.product_ids()? {
            if id != keep && self.remove(id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
