use std::fmt;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Writing the value would exceed the store's capacity.
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
    LockPoisoned(&'static str),
    /// Serialization/deserialization error.
    Serde(String),
}

impl StoreError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::QuotaExceeded {
                key,
                needed,
                available,
            } => write!(
                f,
                "storage quota exceeded writing {} (needed {} bytes, {} available)",
                key, needed, available
            ),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Serde(msg) => write!(f, "store serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
