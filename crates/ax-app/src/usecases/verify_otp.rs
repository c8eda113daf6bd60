use std::sync::Arc;

use tracing::warn;

use ax_core::auth::AuthError;
use ax_core::ports::{ClockPort, OtpChallengeRepositoryPort};

/// Use case for verifying and consuming a one-time passcode.
///
/// A challenge matches on exact (email, code) with expiry not yet passed.
/// The first successful verification deletes the challenge; wrong code,
/// expired code and no code at all collapse into `InvalidOrExpiredOtp`.
pub struct VerifyOtp {
    repository: Arc<dyn OtpChallengeRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl VerifyOtp {
    pub fn new(repository: Arc<dyn OtpChallengeRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { repository, clock }
    }

    pub async fn execute(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let challenge = self
            .repository
            .find(email, code)
            .await
            .map_err(|err| AuthError::OtpStore(err.to_string()))?;

        let Some(challenge) = challenge else {
            return Err(AuthError::InvalidOrExpiredOtp);
        };

        if challenge.is_expired(self.clock.now_ms()) {
            // Expired challenges are removed on detection. A failed cleanup
            // must not change what the caller sees.
            if let Err(err) = self.repository.delete(email).await {
                warn!(email, error = %err, "failed to remove expired verification code");
            }
            return Err(AuthError::InvalidOrExpiredOtp);
        }

        // Single-use: consumption must land before the caller may proceed.
        self.repository
            .delete(email)
            .await
            .map_err(|err| AuthError::OtpStore(err.to_string()))?;

        Ok(())
    }
}
