use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use ax_core::auth::{TokenPair, UserProfile};
use ax_core::ports::{ClockPort, CredentialGatewayPort};

use crate::token_vault::TokenVault;

/// Minimum elapsed time before bootstrap reports completion, so the splash
/// presentation has a guaranteed display window. A UX pacing contract, not a
/// correctness requirement.
pub const MIN_SPLASH: Duration = Duration::from_millis(2000);

/// What initial session recovery found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub user: Option<UserProfile>,
    pub tokens: Option<TokenPair>,
    pub biometric_enabled: bool,
}

/// Use case for recovering a prior session at process start.
///
/// Reads the persisted bearer from the vault and asks the identity provider
/// who it belongs to. Failure to resolve an identity is the normal path to
/// an unauthenticated start, never an error.
pub struct BootstrapSession {
    gateway: Arc<dyn CredentialGatewayPort>,
    vault: Arc<TokenVault>,
    clock: Arc<dyn ClockPort>,
    min_splash: Duration,
}

impl BootstrapSession {
    pub fn new(
        gateway: Arc<dyn CredentialGatewayPort>,
        vault: Arc<TokenVault>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self::with_min_splash(gateway, vault, clock, MIN_SPLASH)
    }

    /// Override the pacing window (tests pass `Duration::ZERO`).
    pub fn with_min_splash(
        gateway: Arc<dyn CredentialGatewayPort>,
        vault: Arc<TokenVault>,
        clock: Arc<dyn ClockPort>,
        min_splash: Duration,
    ) -> Self {
        Self {
            gateway,
            vault,
            clock,
            min_splash,
        }
    }

    pub async fn execute(&self) -> BootstrapOutcome {
        let started_ms = self.clock.now_ms();
        let outcome = self.resolve().await;

        let elapsed_ms = (self.clock.now_ms() - started_ms).max(0) as u64;
        let min_ms = self.min_splash.as_millis() as u64;
        if elapsed_ms < min_ms {
            tokio::time::sleep(Duration::from_millis(min_ms - elapsed_ms)).await;
        }

        outcome
    }

    async fn resolve(&self) -> BootstrapOutcome {
        let biometric_enabled = match self.vault.is_biometric_enabled() {
            Ok(enabled) => enabled,
            Err(err) => {
                warn!(error = %err, "could not read biometric flag; treating as disabled");
                false
            }
        };

        let tokens = match (self.vault.access_token(), self.vault.refresh_token()) {
            (Ok(Some(access)), Ok(Some(refresh))) => TokenPair::from_issued(&access, &refresh),
            (Ok(_), Ok(_)) => None,
            (access, refresh) => {
                for err in [access.err(), refresh.err()].into_iter().flatten() {
                    warn!(error = %err, "could not read persisted tokens");
                }
                None
            }
        };

        let Some(tokens) = tokens else {
            debug!("no persisted bearer; starting unauthenticated");
            return BootstrapOutcome {
                user: None,
                tokens: None,
                biometric_enabled,
            };
        };

        match self.gateway.fetch_current_identity(&tokens.access_token).await {
            Ok(user) => {
                debug!(user_id = %user.id, biometric_enabled, "restored prior session");
                BootstrapOutcome {
                    user: Some(user),
                    tokens: Some(tokens),
                    biometric_enabled,
                }
            }
            Err(err) => {
                debug!(error = %err, "persisted bearer no longer valid; starting unauthenticated");
                BootstrapOutcome {
                    user: None,
                    tokens: None,
                    biometric_enabled,
                }
            }
        }
    }
}
