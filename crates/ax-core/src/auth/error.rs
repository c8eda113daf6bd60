use thiserror::Error;

/// Caller-visible authentication failures, surfaced to the UI layer for
/// messaging.
///
/// Server sign-out failure is deliberately absent: it is logged and swallowed
/// because local teardown must always complete.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad email/password at validation or login.
    #[error("invalid email or password: {0}")]
    InvalidCredentials(String),

    /// Provider-side signup rejection.
    #[error("account creation failed: {0}")]
    AccountCreationFailed(String),

    /// Wrong code, expired code, or no code on record. Collapsed into one
    /// kind; all of them are terminal and require a re-issue.
    #[error("invalid or expired verification code")]
    InvalidOrExpiredOtp,

    /// Identity fetch without a valid bearer.
    #[error("no active session")]
    NoSession,

    /// No biometric hardware, or nothing enrolled.
    #[error("biometric authentication unavailable")]
    BiometricUnavailable,

    /// The biometric prompt was rejected or the device reported an error.
    #[error("biometric authentication failed: {0}")]
    BiometricFailed(String),

    /// The OTP store could not issue or look up a challenge, in both the
    /// durable and the fallback store.
    #[error("verification code storage failed: {0}")]
    OtpStore(String),

    /// The token vault rejected a write that the session depends on.
    #[error("secure token storage failed: {0}")]
    Vault(String),

    /// An operation was invoked from a state it is not legal in, e.g.
    /// account creation without a verified signup challenge.
    #[error("operation not permitted in the current auth state: {0}")]
    IllegalState(&'static str),
}
