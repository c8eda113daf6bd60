use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use ax_core::otp::OtpChallenge;
use ax_core::ports::{OtpChallengeRepositoryPort, OtpStoreError};

use super::MemoryOtpChallengeStore;

/// Durable store with in-memory fallback.
///
/// Every operation tries the primary store first and falls back to the
/// process-lifetime memory store when the primary errors, mirroring issuance
/// and verification so a code issued into the fallback is verifiable from
/// it. Callers never see which store answered; the degraded mode exists so
/// the system stays usable without full backend provisioning.
pub struct FallbackOtpChallengeStore {
    primary: Arc<dyn OtpChallengeRepositoryPort>,
    fallback: MemoryOtpChallengeStore,
}

impl FallbackOtpChallengeStore {
    pub fn new(primary: Arc<dyn OtpChallengeRepositoryPort>) -> Self {
        Self {
            primary,
            fallback: MemoryOtpChallengeStore::new(),
        }
    }
}

#[async_trait]
impl OtpChallengeRepositoryPort for FallbackOtpChallengeStore {
    async fn upsert(&self, challenge: &OtpChallenge) -> Result<(), OtpStoreError> {
        match self.primary.upsert(challenge).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(error = %err, "durable otp store rejected upsert; using in-memory fallback");
                self.fallback.upsert(challenge).await
            }
        }
    }

    async fn find(&self, email: &str, code: &str) -> Result<Option<OtpChallenge>, OtpStoreError> {
        match self.primary.find(email, code).await {
            Ok(found) => Ok(found),
            Err(err) => {
                warn!(error = %err, "durable otp store lookup failed; checking in-memory fallback");
                self.fallback.find(email, code).await
            }
        }
    }

    async fn delete(&self, email: &str) -> Result<(), OtpStoreError> {
        match self.primary.delete(email).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(error = %err, "durable otp store delete failed; deleting from in-memory fallback");
                self.fallback.delete(email).await
            }
        }
    }
}
