//! App lifecycle broadcaster.
//!
//! The embedding shell pushes foreground/background transitions here; the
//! auth stack subscribes through `AppStateEventsPort`.

use tokio::sync::broadcast;
use tracing::debug;

use ax_core::ports::{AppLifecycleState, AppStateEventsPort};

pub struct AppStateBroadcaster {
    sender: broadcast::Sender<AppLifecycleState>,
}

impl AppStateBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Publish a lifecycle transition. A send with no live subscribers is
    /// not an error; the stack may not be attached yet.
    pub fn push(&self, state: AppLifecycleState) {
        match self.sender.send(state) {
            Ok(subscribers) => debug!(?state, subscribers, "app state pushed"),
            Err(_) => debug!(?state, "app state pushed with no subscribers"),
        }
    }
}

impl Default for AppStateBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStateEventsPort for AppStateBroadcaster {
    fn subscribe(&self) -> broadcast::Receiver<AppLifecycleState> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_pushed_transitions() {
        let broadcaster = AppStateBroadcaster::new();
        let mut receiver = broadcaster.subscribe();

        broadcaster.push(AppLifecycleState::Background);

        assert_eq!(receiver.recv().await.unwrap(), AppLifecycleState::Background);
    }

    #[tokio::test]
    async fn pushing_without_subscribers_is_harmless() {
        let broadcaster = AppStateBroadcaster::new();
        broadcaster.push(AppLifecycleState::Active);
    }
}
