use std::sync::Arc;

use tokio::sync::Mutex;

use ax_core::auth::AuthState;

/// Shared auth context containing session state and the dispatch lock.
///
/// The context is the single owner of the process-wide session; every
/// mutation is serialized through the orchestrator's dispatch path.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: Used only for `dispatch` operations to serialize concurrent calls.
/// - `state`: Used for both reading (`get_state`) and writing (during `dispatch`).
#[derive(Clone)]
pub struct AuthContext {
    /// Current auth state.
    state: Arc<Mutex<AuthState>>,
    /// Serializes dispatch calls to prevent concurrent state/action races.
    /// Ensures the entire transition + execute_actions + state_update runs atomically.
    /// Only acquired during `dispatch`, NOT during `get_state`.
    dispatch_lock: Arc<Mutex<()>>,
}

impl AuthContext {
    pub fn new(initial_state: AuthState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial_state)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Context starting from the empty, unbootstrapped session.
    pub fn initial() -> Self {
        Self::new(AuthState::initial())
    }

    /// Returns the context wrapped in Arc for shared ownership.
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Snapshot of the current state.
    ///
    /// This is a lightweight read that does NOT acquire `dispatch_lock`, so
    /// observers always see a fully committed transition.
    pub async fn get_state(&self) -> AuthState {
        self.state.lock().await.clone()
    }

    /// Acquires the dispatch lock for serializing concurrent dispatch calls.
    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Updates the state. Only called while holding `dispatch_lock`.
    pub async fn set_state(&self, state: AuthState) {
        let mut guard = self.state.lock().await;
        *guard = state;
    }
}
