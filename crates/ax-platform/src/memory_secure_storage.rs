use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use ax_core::ports::{SecureStorageError, SecureStoragePort};

/// In-memory secure storage for tests and ephemeral sessions.
///
/// Nothing survives the process; useful wherever a vault is required but
/// durability is not.
#[derive(Default)]
pub struct MemorySecureStorage {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySecureStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, SecureStorageError> {
        self.values
            .lock()
            .map_err(|_| SecureStorageError::Other("storage mutex poisoned".into()))
    }
}

impl SecureStoragePort for MemorySecureStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecureStorageError> {
        Ok(self.locked()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), SecureStorageError> {
        self.locked()?.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SecureStorageError> {
        self.locked()?.remove(key);
        Ok(())
    }
}
