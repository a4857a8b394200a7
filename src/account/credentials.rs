//! Local password overrides.
//!
//! A password change made in the storefront is remembered under one global
//! key, `passwordOverrides`, as a map from lowercased email to an argon2 PHC
//! string. Plaintext is never written.

use std::collections::BTreeMap;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use super::AccountError;
use crate::store::KeyValueStore;

pub const PASSWORD_OVERRIDES_KEY: &str = "passwordOverrides";
pub const MIN_PASSWORD_LEN: usize = 8;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct CredentialStore<'a, S> {
    store: &'a S,
}

impl<'a, S: KeyValueStore> CredentialStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// True when a password change has been recorded for `email`.
    pub fn has_override(&self, email: &str) -> Result<bool, AccountError> {
        Ok(self.overrides()?.contains_key(&normalize_email(email)))
    }

    /// Check `password` against the recorded override. False when there is none.
    pub fn verify(&self, email: &str, password: &str) -> Result<bool, AccountError> {
        match self.overrides()?.get(&normalize_email(email)) {
            Some(hash) => verify_hash(hash, password),
            None => Ok(false),
        }
    }

    /// Record a new password for `email`.
    ///
    /// When an override already exists, `current` must match it.
    pub fn change_password(
        &self,
        email: &str,
        current: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword);
        }
        if new_password == current {
            return Err(AccountError::SamePassword);
        }

        let email = normalize_email(email);
        let mut overrides = self.overrides()?;
        if let Some(hash) = overrides.get(&email) {
            if !verify_hash(hash, current)? {
                tracing::debug!(%email, "password change refused, current password mismatch");
                return Err(AccountError::InvalidPassword);
            }
        }

        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = Argon2::default()
            .hash_password(new_password.as_bytes(), &salt)
            .map_err(|e| AccountError::Hash(e.to_string()))?;
        overrides.insert(email.clone(), hash.to_string());

        self.store
            .set(PASSWORD_OVERRIDES_KEY, serde_json::to_string(&overrides)?)?;
        tracing::info!(%email, "password override stored");
        Ok(())
    }

    /// Forget the override for `email`. Returns true if one existed.
    pub fn clear(&self, email: &str) -> Result<bool, AccountError> {
        let mut overrides = self.overrides()?;
        let removed = overrides.remove(&normalize_email(email)).is_some();
        if removed {
            self.store
                .set(PASSWORD_OVERRIDES_KEY, serde_json::to_string(&overrides)?)?;
        }
        Ok(removed)
    }

    fn overrides(&self) -> Result<BTreeMap<String, String>, AccountError> {
        match self.store.get(PASSWORD_OVERRIDES_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(BTreeMap::new()),
        }
    }
}

fn verify_hash(hash: &str, password: &str) -> Result<bool, AccountError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AccountError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
