//! App-state watcher.
//!
//! Bridges the platform's foreground/background notification channel into
//! orchestrator dispatch. One subscription is registered at startup and
//! released when the guard drops, so a torn-down stack leaves no task
//! behind.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use ax_core::ports::AppStateEventsPort;

use crate::orchestrator::AuthOrchestrator;

/// Scoped subscription to app lifecycle transitions. Dropping the watcher
/// aborts the background task.
pub struct AppStateWatcher {
    handle: JoinHandle<()>,
}

impl AppStateWatcher {
    pub fn attach(
        orchestrator: Arc<AuthOrchestrator>,
        events: Arc<dyn AppStateEventsPort>,
    ) -> Self {
        let mut receiver = events.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(state) => {
                        debug!(?state, "app lifecycle transition observed");
                        if let Err(err) = orchestrator.notify_app_state(state).await {
                            error!(error = %err, "app-state dispatch failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "app-state watcher lagged behind the channel");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Self { handle }
    }

    /// Whether the background task has ended (the event source closed).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AppStateWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ax_core::auth::UserProfile;
    use ax_core::ports::{
        AppLifecycleState, AuthEventPort, ClockPort, CreatedAccount, CredentialGatewayPort,
        GatewayError, OtpChallengeRepositoryPort, OtpDeliveryPort, OtpStoreError, ProviderSession,
    };
    use ax_core::{AuthState, OtpChallenge, OtpCode, SecretString, TokenPair};
    use ax_platform::{DevBiometricGate, MemorySecureStorage};

    use crate::token_vault::TokenVault;
    use crate::usecases::{BootstrapSession, IssueOtp, SignOutSession, VerifyOtp};

    struct RestoringGateway;

    #[async_trait::async_trait]
    impl CredentialGatewayPort for RestoringGateway {
        async fn validate_credentials(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn login(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<ProviderSession, GatewayError> {
            Err(GatewayError::Rejected("unused".into()))
        }

        async fn create_account(
            &self,
            _email: &str,
            _password: &SecretString,
            _name: &str,
        ) -> Result<CreatedAccount, GatewayError> {
            Err(GatewayError::Rejected("unused".into()))
        }

        async fn fetch_current_identity(
            &self,
            _access_token: &str,
        ) -> Result<UserProfile, GatewayError> {
            Ok(UserProfile::new("u1", "Dana", "dana@x.com"))
        }

        async fn revoke_server_session(&self, _access_token: &str) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    struct NullRepository;

    #[async_trait::async_trait]
    impl OtpChallengeRepositoryPort for NullRepository {
        async fn upsert(&self, _challenge: &OtpChallenge) -> Result<(), OtpStoreError> {
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

    struct NullDelivery;

    #[async_trait::async_trait]
    impl OtpDeliveryPort for NullDelivery {
        async fn deliver(&self, _email: &str, _code: &OtpCode) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    struct NullEvents;

    #[async_trait::async_trait]
    impl AuthEventPort for NullEvents {
        async fn emit_auth_state_changed(&self, _state: AuthState) {}
    }

    struct FixedClock;

    impl ClockPort for FixedClock {
        fn now_ms(&self) -> i64 {
            0
        }
    }

    struct ChannelEvents {
        sender: broadcast::Sender<AppLifecycleState>,
    }

    impl AppStateEventsPort for ChannelEvents {
        fn subscribe(&self) -> broadcast::Receiver<AppLifecycleState> {
            self.sender.subscribe()
        }
    }

    /// Orchestrator with a restored session that has not committed a
    /// biometric decision, which is exactly what the guard protects.
    async fn restored_orchestrator() -> (Arc<AuthOrchestrator>, Arc<TokenVault>) {
        let gateway = Arc::new(RestoringGateway);
        let vault = Arc::new(TokenVault::new(Arc::new(MemorySecureStorage::new())));
        vault.save_tokens(&TokenPair::new("at", "rt")).unwrap();
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock);

        let orchestrator = Arc::new(AuthOrchestrator::new(
            Arc::new(IssueOtp::new(
                Arc::new(NullRepository),
                Arc::new(NullDelivery),
                clock.clone(),
            )),
            Arc::new(VerifyOtp::new(Arc::new(NullRepository), clock.clone())),
            Arc::new(BootstrapSession::with_min_splash(
                gateway.clone(),
                vault.clone(),
                clock,
                Duration::ZERO,
            )),
            Arc::new(SignOutSession::new(gateway.clone(), vault.clone())),
            gateway,
            vault.clone(),
            Arc::new(DevBiometricGate::unavailable()),
            Arc::new(NullEvents),
        ));
        orchestrator.bootstrap().await.unwrap();
        assert!(orchestrator.state().await.session.is_authenticated());
        (orchestrator, vault)
    }

    #[tokio::test]
    async fn backgrounding_through_the_watcher_signs_the_session_out() {
        let (orchestrator, vault) = restored_orchestrator().await;
        let (sender, _keepalive) = broadcast::channel(4);
        let events = Arc::new(ChannelEvents {
            sender: sender.clone(),
        });
        let _watcher = AppStateWatcher::attach(orchestrator.clone(), events);

        sender.send(AppLifecycleState::Background).unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        loop {
            if !orchestrator.state().await.session.is_authenticated() {
                break;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "suspension guard never fired"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(vault.access_token().unwrap(), None);
    }

    #[tokio::test]
    async fn foreground_transitions_do_not_touch_the_session() {
        let (orchestrator, _vault) = restored_orchestrator().await;
        let (sender, _keepalive) = broadcast::channel(4);
        let events = Arc::new(ChannelEvents {
            sender: sender.clone(),
        });
        let _watcher = AppStateWatcher::attach(orchestrator.clone(), events);

        sender.send(AppLifecycleState::Active).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(orchestrator.state().await.session.is_authenticated());
    }

    #[tokio::test]
    async fn watcher_task_ends_when_the_source_closes() {
        let (orchestrator, _vault) = restored_orchestrator().await;
        let (sender, _keepalive) = broadcast::channel(4);
        let events = Arc::new(ChannelEvents { sender });
        let watcher = AppStateWatcher::attach(orchestrator, events.clone());

        drop(events);
        drop(_keepalive);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
        while !watcher.is_finished() {
            assert!(
                tokio::time::Instant::now() < deadline,
                "watcher task never ended"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
