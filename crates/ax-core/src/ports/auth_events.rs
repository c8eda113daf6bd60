use crate::auth::AuthState;

/// Outbound notification of committed session transitions, consumed by the
/// UI layer. Every emitted snapshot is consistent: no partial transition is
/// ever visible.
#[async_trait::async_trait]
pub trait AuthEventPort: Send + Sync {
    async fn emit_auth_state_changed(&self, state: AuthState);
}
