//! Tunables for the review subsystem.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration:
//!
//! ```ignore
//! let config = ReviewsConfig::from_json(r#"{ "groupItemLimit": 5 }"#)?;
//! let config = ReviewsConfig::load(&store)?; // reads `reviewsConfig`, defaults when absent
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Store key the configuration is read from.
pub const CONFIG_KEY: &str = "reviewsConfig";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewsConfig {
    /// Avatar path substituted for embedded `data:` images.
    pub placeholder_avatar: String,
    /// Prefix of per-product blob keys (`productReviews_<id>`).
    pub product_key_prefix: String,
    /// Ids at or below this value are seed records.
    pub mock_id_ceiling: u64,
    /// Encoded blob size that triggers truncation.
    pub max_blob_bytes: usize,
    /// Reviews kept when the blob is over `max_blob_bytes`.
    pub truncate_keep: usize,
    /// Reviews kept on the first retry after a quota failure.
    pub reduced_keep: usize,
    /// Reviews kept on the last-resort minimal write.
    pub minimal_keep: usize,
    /// Items shown per product group on the profile page before "show more".
    pub group_item_limit: usize,
    /// Product groups per profile page.
    pub groups_per_page: usize,
    /// Characters of the parent comment quoted next to a reply.
    pub parent_preview_chars: usize,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            placeholder_avatar: "/images/default-avatar.png".to_string(),
            product_key_prefix: "productReviews_".to_string(),
            mock_id_ceiling: 1000,
            max_blob_bytes: 4 * 1024 * 1024,
            truncate_keep: 50,
            reduced_keep: 20,
            minimal_keep: 10,
            group_item_limit: 3,
            groups_per_page: 5,
            parent_preview_chars: 50,
        }
    }
}

impl ReviewsConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Serde(e.to_string()))
    }

    /// Load from [`CONFIG_KEY`], falling back to defaults when the key is absent.
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self, ConfigError> {
        match store.get(CONFIG_KEY)? {
            Some(raw) => Self::from_json(&raw),
            None => Ok(Self::default()),
        }
    }

    pub fn save<S: KeyValueStore>(&self, store: &S) -> Result<(), ConfigError> {
        let raw = serde_json::to_string(self).map_err(|e| ConfigError::Serde(e.to_string()))?;
        store.set(CONFIG_KEY, raw)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Serde(String),
    Store(StoreError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Serde(msg) => write!(f, "invalid reviews config: {}", msg),
            ConfigError::Store(err) => write!(f, "reviews config store error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<StoreError> for ConfigError {
    fn from(err: StoreError) -> Self {
        ConfigError::Store(err)
    }
}
