use std::sync::Arc;

use tracing::{debug, warn};

use ax_core::auth::TokenPair;
use ax_core::ports::CredentialGatewayPort;

use crate::token_vault::TokenVault;

/// Use case for tearing a session down.
///
/// The contract is "this device forgets": the server-side revoke is
/// best-effort and vault failures are swallowed, because local clearing must
/// always complete. The biometric-enabled device flag survives.
pub struct SignOutSession {
    gateway: Arc<dyn CredentialGatewayPort>,
    vault: Arc<TokenVault>,
}

impl SignOutSession {
    pub fn new(gateway: Arc<dyn CredentialGatewayPort>, vault: Arc<TokenVault>) -> Self {
        Self { gateway, vault }
    }

    pub async fn execute(&self, tokens: Option<&TokenPair>) {
        if let Some(tokens) = tokens {
            match self
                .gateway
                .revoke_server_session(&tokens.access_token)
                .await
            {
                Ok(()) => debug!("server session revoked"),
                Err(err) => {
                    warn!(error = %err, "server-side sign-out failed; clearing local session anyway")
                }
            }
        }

        if let Err(err) = self.vault.clear_tokens() {
            warn!(error = %err, "vault clear failed during sign-out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ax_core::auth::UserProfile;
    use ax_core::ports::{CreatedAccount, GatewayError, ProviderSession};
    use ax_core::SecretString;
    use ax_platform::MemorySecureStorage;

    struct RevokeCountingGateway {
        revokes: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl CredentialGatewayPort for RevokeCountingGateway {
        async fn validate_credentials(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<(), GatewayError> {
            unimplemented!("not exercised by sign-out")
        }

        async fn login(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<ProviderSession, GatewayError> {
            unimplemented!("not exercised by sign-out")
        }

        async fn create_account(
            &self,
            _email: &str,
            _password: &SecretString,
            _name: &str,
        ) -> Result<CreatedAccount, GatewayError> {
            unimplemented!("not exercised by sign-out")
        }

        async fn fetch_current_identity(
            &self,
            _access_token: &str,
        ) -> Result<UserProfile, GatewayError> {
            Err(GatewayError::NoSession)
        }

        async fn revoke_server_session(&self, _access_token: &str) -> Result<(), GatewayError> {
            self.revokes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(GatewayError::Transport("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn clears_tokens_and_keeps_the_biometric_flag() {
        let vault = Arc::new(TokenVault::new(Arc::new(MemorySecureStorage::new())));
        vault.save_tokens(&TokenPair::new("at", "rt")).unwrap();
        vault.set_biometric_enabled(true).unwrap();
        let gateway = Arc::new(RevokeCountingGateway {
            revokes: AtomicUsize::new(0),
            fail: false,
        });

        SignOutSession::new(gateway.clone(), vault.clone())
            .execute(Some(&TokenPair::new("at", "rt")))
            .await;

        assert_eq!(gateway.revokes.load(Ordering::SeqCst), 1);
        assert_eq!(vault.access_token().unwrap(), None);
        assert!(vault.is_biometric_enabled().unwrap());
    }

    #[tokio::test]
    async fn revoke_failure_still_clears_locally() {
        let vault = Arc::new(TokenVault::new(Arc::new(MemorySecureStorage::new())));
        vault.save_tokens(&TokenPair::new("at", "rt")).unwrap();
        let gateway = Arc::new(RevokeCountingGateway {
            revokes: AtomicUsize::new(0),
            fail: true,
        });

        SignOutSession::new(gateway, vault.clone())
            .execute(Some(&TokenPair::new("at", "rt")))
            .await;

        assert_eq!(vault.access_token().unwrap(), None);
        assert_eq!(vault.refresh_token().unwrap(), None);
    }

    #[tokio::test]
    async fn without_tokens_no_revoke_is_attempted() {
        let vault = Arc::new(TokenVault::new(Arc::new(MemorySecureStorage::new())));
        let gateway = Arc::new(RevokeCountingGateway {
            revokes: AtomicUsize::new(0),
            fail: false,
        });

        SignOutSession::new(gateway.clone(), vault).execute(None).await;
        assert_eq!(gateway.revokes.load(Ordering::SeqCst), 0);
    }
}
