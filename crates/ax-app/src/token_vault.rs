//! Token vault
//!
//! Typed facade over the platform secure storage for the session's bearer
//! tokens and the durable biometric-enabled device flag. Keys live under the
//! "auth" namespace, partitioned from any other secure-storage user.

use std::sync::Arc;

use ax_core::auth::TokenPair;
use ax_core::ports::{SecureStorageError, SecureStoragePort};

const ACCESS_TOKEN_KEY: &str = "auth:access_token";
const REFRESH_TOKEN_KEY: &str = "auth:refresh_token";
const BIOMETRIC_ENABLED_KEY: &str = "auth:biometric_enabled";

pub struct TokenVault {
    storage: Arc<dyn SecureStoragePort>,
}

impl TokenVault {
    pub fn new(storage: Arc<dyn SecureStoragePort>) -> Self {
        Self { storage }
    }

    pub fn save_tokens(&self, tokens: &TokenPair) -> Result<(), SecureStorageError> {
        self.storage
            .set(ACCESS_TOKEN_KEY, tokens.access_token.as_bytes())?;
        self.storage
            .set(REFRESH_TOKEN_KEY, tokens.refresh_token.as_bytes())
    }

    pub fn access_token(&self) -> Result<Option<String>, SecureStorageError> {
        self.read_string(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, SecureStorageError> {
        self.read_string(REFRESH_TOKEN_KEY)
    }

    /// Remove both bearer tokens. The biometric-enabled flag is NOT touched:
    /// the device remembers that biometric was configured across sign-outs.
    pub fn clear_tokens(&self) -> Result<(), SecureStorageError> {
        self.storage.delete(ACCESS_TOKEN_KEY)?;
        self.storage.delete(REFRESH_TOKEN_KEY)
    }

    pub fn set_biometric_enabled(&self, enabled: bool) -> Result<(), SecureStorageError> {
        let value: &[u8] = if enabled { b"true" } else { b"false" };
        self.storage.set(BIOMETRIC_ENABLED_KEY, value)
    }

    /// Missing flag reads as disabled.
    pub fn is_biometric_enabled(&self) -> Result<bool, SecureStorageError> {
        Ok(matches!(
            self.storage.get(BIOMETRIC_ENABLED_KEY)?.as_deref(),
            Some(b"true")
        ))
    }

    fn read_string(&self, key: &str) -> Result<Option<String>, SecureStorageError> {
        match self.storage.get(key)? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| SecureStorageError::Corrupt(format!("{key} is not valid utf-8"))),
        }
    }
}
