use super::TokenPair;

/// Why a session teardown was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// Explicit user sign-out (including cancel on the re-entry screen).
    UserRequested,
    /// Biometric setup was skipped on the signup path; a fresh signup must
    /// pass the biometric decision point, so the session is abandoned.
    BiometricSetupAbandoned,
    /// The app was suspended while the session had not yet committed to a
    /// biometric or explicit-skip decision.
    SuspendedWithoutBiometricSetup,
}

/// Side effects produced by state transitions.
///
/// 状态迁移产生的副作用。
///
/// The orchestrator executes these through ports after each transition and
/// feeds any follow-up events back into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Persist bearer tokens into the vault.
    PersistTokens(TokenPair),
    /// Persist the durable biometric-enabled device flag.
    PersistBiometricEnabled(bool),
    /// Revoke the server session (best-effort), clear the vault's tokens and
    /// report back with `AuthEvent::SignedOut`. The biometric-enabled device
    /// flag is left untouched.
    TearDownSession { reason: TeardownReason },
}
