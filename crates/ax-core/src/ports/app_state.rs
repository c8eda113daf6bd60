//! App lifecycle event port
//!
//! Foreground/background notification channel. The auth orchestrator
//! registers one subscription at startup and tears it down on shutdown; the
//! platform layer decides where the transitions actually come from.

use tokio::sync::broadcast;

/// Coarse app lifecycle state, as mobile platforms report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AppLifecycleState {
    Active,
    Inactive,
    Background,
}

impl AppLifecycleState {
    /// Background and inactive both count as "suspended" for the
    /// incomplete-biometric-setup guard.
    pub fn is_suspended(&self) -> bool {
        matches!(self, AppLifecycleState::Inactive | AppLifecycleState::Background)
    }
}

pub trait AppStateEventsPort: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<AppLifecycleState>;
}
