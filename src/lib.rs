//! # axys
//!
//! Session and authentication orchestration core for the Axys banking app:
//! email/password signup and login behind an OTP gate, device biometric
//! unlock, and app-state-triggered session revocation, owned by a single
//! process-wide state machine.
//!
//! The embedding mobile shell drives [`AuthOrchestrator`] from its screens,
//! pushes lifecycle transitions into [`bootstrap::AuthStack::app_state`] and
//! renders from the snapshots emitted on
//! [`bootstrap::AuthStack::auth_events`].

pub mod bootstrap;
pub mod config;
pub mod logging;

pub use bootstrap::{build_auth_stack, build_auth_stack_with_biometrics, AuthStack};
pub use config::AppConfig;

// Re-export the surface the shell programs against.
pub use ax_app::{AuthOrchestrator, OtpVerification, SignupOutcome, TokenVault};
pub use ax_core::auth::{
    AuthError, AuthFlow, AuthStage, AuthState, Session, TokenPair, UserProfile,
};
pub use ax_core::ports::{AppLifecycleState, BiometricKind};
pub use ax_core::SecretString;
