use std::sync::Arc;

use tracing::{debug, warn};

use ax_core::auth::AuthError;
use ax_core::otp::{OtpChallenge, OtpCode};
use ax_core::ports::{ClockPort, OtpChallengeRepositoryPort, OtpDeliveryPort};

/// Use case for issuing a one-time passcode challenge.
///
/// Issuance success means "a verifiable code now exists": the upsert must
/// land (durable store or its fallback), while delivery is best-effort. A
/// re-send is the same operation; the upsert overwrites the outstanding
/// challenge, so at most one code per email is valid at any instant.
pub struct IssueOtp {
    repository: Arc<dyn OtpChallengeRepositoryPort>,
    delivery: Arc<dyn OtpDeliveryPort>,
    clock: Arc<dyn ClockPort>,
}

impl IssueOtp {
    pub fn new(
        repository: Arc<dyn OtpChallengeRepositoryPort>,
        delivery: Arc<dyn OtpDeliveryPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            repository,
            delivery,
            clock,
        }
    }

    pub async fn execute(&self, email: &str) -> Result<(), AuthError> {
        let code = OtpCode::generate();
        let challenge = OtpChallenge::issue(email, code, self.clock.now_ms());

        self.repository
            .upsert(&challenge)
            .await
            .map_err(|err| AuthError::OtpStore(err.to_string()))?;

        match self.delivery.deliver(email, &challenge.code).await {
            Ok(true) => debug!(email, "verification code dispatched"),
            Ok(false) => debug!(email, "verification code delivery skipped (degraded mode)"),
            Err(err) => warn!(
                email,
                error = %err,
                "verification code delivery failed; the code remains verifiable"
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use ax_core::ports::OtpStoreError;

    struct RecordingRepository {
        stored: Mutex<Vec<OtpChallenge>>,
        fail: bool,
    }

    impl RecordingRepository {
        fn new(fail: bool) -> Self {
            Self {
                stored: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait::async_trait]
    impl OtpChallengeRepositoryPort for RecordingRepository {
        async fn upsert(&self, challenge: &OtpChallenge) -> Result<(), OtpStoreError> {
            if self.fail {
                return Err(OtpStoreError::Storage("table missing".into()));
            }
            self.stored.lock().unwrap().push(challenge.clone());
            Ok(())
        }

        async fn find(
            &self,
            _email: &str,
            _code: &str,
        ) -> Result<Option<OtpChallenge>, OtpStoreError> {
            Ok(None)
        }

        async fn delete(&self, _email: &str) -> Result<(), OtpStoreError> {
            Ok(())
        }
    }

    struct FailingDelivery;

    #[async_trait::async_trait]
    impl ax_core::ports::OtpDeliveryPort for FailingDelivery {
        async fn deliver(&self, _email: &str, _code: &OtpCode) -> anyhow::Result<bool> {
            anyhow::bail!("smtp is down")
        }
    }

    struct SilentDelivery;

    #[async_trait::async_trait]
    impl ax_core::ports::OtpDeliveryPort for SilentDelivery {
        async fn deliver(&self, _email: &str, _code: &OtpCode) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    struct FixedClock(i64);

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            self.0
        }
    }

    #[tokio::test]
    async fn issues_a_challenge_with_the_standard_window() {
        let repository = Arc::new(RecordingRepository::new(false));
        let use_case = IssueOtp::new(
            repository.clone(),
            Arc::new(SilentDelivery),
            Arc::new(FixedClock(10_000)),
        );

        use_case.execute("a@x.com").await.unwrap();

        let stored = repository.stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email, "a@x.com");
        assert_eq!(stored[0].created_at_ms, 10_000);
        assert_eq!(stored[0].expires_at_ms, 10_000 + ax_core::OTP_TTL_MS);
    }

    #[tokio::test]
    async fn delivery_failure_does_not_fail_issuance() {
        let repository = Arc::new(RecordingRepository::new(false));
        let use_case = IssueOtp::new(
            repository.clone(),
            Arc::new(FailingDelivery),
            Arc::new(FixedClock(0)),
        );

        use_case.execute("a@x.com").await.unwrap();
        assert_eq!(repository.stored.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn storage_failure_fails_issuance() {
        let use_case = IssueOtp::new(
            Arc::new(RecordingRepository::new(true)),
            Arc::new(SilentDelivery),
            Arc::new(FixedClock(0)),
        );

        let err = use_case.execute("a@x.com").await.unwrap_err();
        assert!(matches!(err, AuthError::OtpStore(_)));
    }
}
