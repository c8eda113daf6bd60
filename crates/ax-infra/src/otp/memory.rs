use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use ax_core::otp::OtpChallenge;
use ax_core::ports::{OtpChallengeRepositoryPort, OtpStoreError};

/// Process-lifetime in-memory challenge store.
///
/// Backs the degraded mode when the durable store is unusable (e.g. the
/// backing table was never provisioned); also handy in tests.
#[derive(Default)]
pub struct MemoryOtpChallengeStore {
    challenges: Mutex<HashMap<String, OtpChallenge>>,
}

impl MemoryOtpChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<MutexGuard<'_, HashMap<String, OtpChallenge>>, OtpStoreError> {
        self.challenges
            .lock()
            .map_err(|_| OtpStoreError::Storage("challenge mutex poisoned".into()))
    }
}

#[async_trait]
impl OtpChallengeRepositoryPort for MemoryOtpChallengeStore {
    async fn upsert(&self, challenge: &OtpChallenge) -> Result<(), OtpStoreError> {
        self.locked()?
            .insert(challenge.email.clone(), challenge.clone());
        Ok(())
    }

    async fn find(&self, email: &str, code: &str) -> Result<Option<OtpChallenge>, OtpStoreError> {
        Ok(self
            .locked()?
            .get(email)
            .filter(|challenge| challenge.code.as_str() == code)
            .cloned())
    }

    async fn delete(&self, email: &str) -> Result<(), OtpStoreError> {
        self.locked()?.remove(email);
        Ok(())
    }
}
