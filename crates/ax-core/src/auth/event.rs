use super::{TokenPair, UserProfile};

/// Events that drive the authentication session state machine.
///
/// 驱动认证会话状态机的事件。
///
/// Events describe completed facts (a gateway call that already succeeded,
/// an app-lifecycle transition that already happened); the side effects that
/// produce them are executed by the orchestrator in `ax-app`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Initial session recovery finished, successfully or not.
    BootstrapResolved {
        user: Option<UserProfile>,
        tokens: Option<TokenPair>,
        biometric_enabled: bool,
    },
    /// The real, session-creating login call succeeded after the OTP gate.
    LoginSucceeded {
        user: UserProfile,
        tokens: TokenPair,
        biometric_enabled: bool,
    },
    /// The identity provider accepted account creation. `tokens` is `None`
    /// when the provider defers session issuance to email confirmation.
    AccountCreated {
        user: Option<UserProfile>,
        tokens: Option<TokenPair>,
    },
    /// The device biometric prompt during setup succeeded.
    BiometricSetupSucceeded,
    /// The user explicitly skipped or cancelled biometric setup.
    BiometricSetupSkipped,
    /// The re-entry biometric prompt on a restored session succeeded.
    BiometricReentrySucceeded,
    /// The app moved to background or inactive.
    AppSuspended,
    /// The user asked to sign out.
    SignOutRequested,
    /// Session teardown (server revoke + vault clear) completed locally.
    SignedOut,
    /// The one-time post-signup navigation has been consumed by the UI.
    SignupCompletionAcknowledged,
}
