//! OTP challenge repository port
//!
//! Contract for the durable challenge store: upsert keyed by email (which is
//! what enforces the single-code-per-email invariant), point lookup by
//! (email, code), delete by email. Expiry is compared by the verify use case
//! against the clock port, so both the durable and the in-memory fallback
//! implementation stay dumb about time.

use async_trait::async_trait;
use thiserror::Error;

use crate::otp::OtpChallenge;

#[derive(Debug, Error)]
pub enum OtpStoreError {
    #[error("otp storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait OtpChallengeRepositoryPort: Send + Sync {
    /// Insert or overwrite the challenge for `challenge.email`.
    async fn upsert(&self, challenge: &OtpChallenge) -> Result<(), OtpStoreError>;

    /// Exact (email, code) lookup. Returns the stored challenge regardless
    /// of expiry.
    async fn find(&self, email: &str, code: &str) -> Result<Option<OtpChallenge>, OtpStoreError>;

    /// Remove whatever challenge is stored for `email`.
    async fn delete(&self, email: &str) -> Result<(), OtpStoreError>;
}
