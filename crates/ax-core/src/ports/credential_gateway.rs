//! Credential gateway port
//!
//! Wraps the external identity provider: password validation, account
//! creation, session-creating login, identity fetch and server-side
//! revocation. The gateway holds no local state; token persistence is the
//! vault's job.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::UserProfile;
use crate::security::SecretString;

/// A session actually issued by the provider. Both tokens are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of account creation. Tokens may legitimately be empty when the
/// provider requires email confirmation before issuing a session; that is
/// "account created, not yet authenticated", not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAccount {
    pub user: Option<UserProfile>,
    pub access_token: String,
    pub refresh_token: String,
}

/// Uniform gateway failures. Provider errors are wrapped, not re-coded; the
/// calling use case decides which `AuthError` kind an operation surfaces.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The provider rejected the request (bad credentials, signup refused).
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),

    /// No valid bearer was attached to an identity fetch.
    #[error("no valid bearer session")]
    NoSession,

    /// The provider could not be reached or answered with garbage.
    #[error("identity provider request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait CredentialGatewayPort: Send + Sync {
    /// Check an email/password pair without creating a persistent session.
    ///
    /// Internally this performs a login handshake purely to check the
    /// password and immediately revokes the probe session; nothing may be
    /// persisted as a side effect.
    async fn validate_credentials(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), GatewayError>;

    /// The real, session-creating login call.
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ProviderSession, GatewayError>;

    /// Create an account with a display name attached as provider metadata.
    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
        name: &str,
    ) -> Result<CreatedAccount, GatewayError>;

    /// Fetch the identity the given bearer belongs to.
    async fn fetch_current_identity(&self, access_token: &str)
        -> Result<UserProfile, GatewayError>;

    /// Revoke the server-side session. Callers treat failures as non-fatal.
    async fn revoke_server_session(&self, access_token: &str) -> Result<(), GatewayError>;
}
