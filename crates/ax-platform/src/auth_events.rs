//! Auth state broadcaster.
//!
//! Fans committed session transitions out to UI observers. The orchestrator
//! emits through `AuthEventPort`; screens subscribe and re-render from the
//! snapshots.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use ax_core::auth::AuthState;
use ax_core::ports::AuthEventPort;

pub struct AuthStateBroadcaster {
    sender: broadcast::Sender<AuthState>,
}

impl AuthStateBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(32);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthState> {
        self.sender.subscribe()
    }
}

impl Default for AuthStateBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthEventPort for AuthStateBroadcaster {
    async fn emit_auth_state_changed(&self, state: AuthState) {
        match self.sender.send(state) {
            Ok(subscribers) => debug!(subscribers, "auth state emitted"),
            Err(_) => debug!("auth state emitted with no subscribers"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ax_core::auth::AuthStage;

    #[tokio::test]
    async fn subscribers_see_emitted_states() {
        let broadcaster = AuthStateBroadcaster::new();
        let mut receiver = broadcaster.subscribe();

        let mut state = AuthState::initial();
        state.session.bootstrap_done = true;
        broadcaster.emit_auth_state_changed(state.clone()).await;

        let observed = receiver.recv().await.unwrap();
        assert_eq!(observed, state);
        assert_eq!(observed.stage, AuthStage::Unbootstrapped);
    }

    #[tokio::test]
    async fn emitting_without_subscribers_is_harmless() {
        let broadcaster = AuthStateBroadcaster::new();
        broadcaster
            .emit_auth_state_changed(AuthState::initial())
            .await;
    }
}
