//! Per-user account records kept next to the reviews.
//!
//! Each record type lives under `<PREFIX>_<userId>` as one JSON value. Types
//! opt in with `#[derive(AccountRecord)]` and are accessed through
//! [`AccountRecordsExt::records`].
//!
//! ## Example
//!
//! ```ignore
//! use hive_reviews::{AccountRecordsExt, InMemoryStore, NotificationSettings, UserId};
//!
//! let store = InMemoryStore::new();
//! let settings = NotificationSettings::new(UserId::from(42));
//! store.records::<NotificationSettings>().save(&settings)?;
//!
//! let loaded = store.records::<NotificationSettings>().get(&UserId::from(42))?;
//! ```

mod credentials;
mod records;

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::model::UserId;
use crate::store::KeyValueStore;

pub use credentials::{CredentialStore, MIN_PASSWORD_LEN, PASSWORD_OVERRIDES_KEY};
pub use records::{
    NotificationSettings, Order, OrderHistory, OrderLine, OrderStatus, SavedCard, SavedCards,
    ShippingAddress,
};

/// A JSON record owned by a single user.
pub trait AccountRecord: Serialize + DeserializeOwned {
    /// Storage key prefix, joined to the owner id with `_`.
    const PREFIX: &'static str;

    fn owner(&self) -> &UserId;

    fn key_for(owner: &UserId) -> String {
        format!("{}_{}", Self::PREFIX, owner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    Store(StoreError),
    Serde(String),
    /// The current password did not verify.
    InvalidPassword,
    /// The new password is shorter than [`MIN_PASSWORD_LEN`].
    WeakPassword,
    /// The new password equals the current one.
    SamePassword,
    Hash(String),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::Store(err) => write!(f, "account store error: {}", err),
            AccountError::Serde(msg) => write!(f, "invalid account record: {}", msg),
            AccountError::InvalidPassword => write!(f, "current password is incorrect"),
            AccountError::WeakPassword => write!(
                f,
                "new password must have at least {} characters",
                MIN_PASSWORD_LEN
            ),
            AccountError::SamePassword => {
                write!(f, "new password must differ from the current one")
            }
            AccountError::Hash(msg) => write!(f, "password hashing failed: {}", msg),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        AccountError::Store(err)
    }
}

impl From<serde_json::Error> for AccountError {
    fn from(err: serde_json::Error) -> Self {
        AccountError::Serde(err.to_string())
    }
}

/// Typed access to one kind of [`AccountRecord`].
pub struct RecordRepository<'a, S, T> {
    store: &'a S,
    _marker: PhantomData<T>,
}

impl<'a, S: KeyValueStore, T: AccountRecord> RecordRepository<'a, S, T> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// The record owned by `owner`, if one was saved.
    pub fn get(&self, owner: &UserId) -> Result<Option<T>, AccountError> {
        match self.store.get(&T::key_for(owner))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Store `record` under its owner's key, replacing any previous value.
    pub fn save(&self, record: &T) -> Result<(), AccountError> {
        let key = T::key_for(record.owner());
        self.store.set(&key, serde_json::to_string(record)?)?;
        tracing::debug!(%key, "account record saved");
        Ok(())
    }

    /// Delete the record owned by `owner`. Returns true if it existed.
    pub fn delete(&self, owner: &UserId) -> Result<bool, AccountError> {
        Ok(self.store.remove(&T::key_for(owner))?)
    }
}

/// Extension trait for typed account record access on any KeyValueStore.
pub trait AccountRecordsExt: KeyValueStore + Sized {
    fn records<T: AccountRecord>(&self) -> RecordRepository<'_, Self, T> {
        RecordRepository::new(self)
    }

    fn credentials(&self) -> CredentialStore<'_, Self> {
        CredentialStore::new(self)
    }
}

impl<S: KeyValueStore> AccountRecordsExt for S {}
