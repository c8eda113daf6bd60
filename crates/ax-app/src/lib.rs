//! # ax-app
//!
//! Application layer for the Axys auth session: use cases, the token vault
//! and the orchestrator that owns the process-wide session state.

pub mod context;
pub mod lifecycle;
pub mod orchestrator;
pub mod token_vault;
pub mod usecases;

pub use context::AuthContext;
pub use lifecycle::AppStateWatcher;
pub use orchestrator::{AuthOrchestrator, OtpVerification, SignupOutcome};
pub use token_vault::TokenVault;
