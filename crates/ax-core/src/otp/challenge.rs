use super::OtpCode;

/// Validity window of an issued code: 5 minutes.
pub const OTP_TTL_MS: i64 = 5 * 60 * 1000;

/// An outstanding one-time passcode challenge, keyed by email.
///
/// At most one challenge is valid per email at any instant; issuing a new
/// challenge for the same email overwrites the prior one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub email: String,
    pub code: OtpCode,
    pub expires_at_ms: i64,
    pub created_at_ms: i64,
}

impl OtpChallenge {
    /// Build a challenge issued at `now_ms` with the standard validity window.
    pub fn issue(email: impl Into<String>, code: OtpCode, now_ms: i64) -> Self {
        Self {
            email: email.into(),
            code,
            expires_at_ms: now_ms + OTP_TTL_MS,
            created_at_ms: now_ms,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms < now_ms
    }
}
