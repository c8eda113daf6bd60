//! OTP delivery port
//!
//! Sends an issued code to its recipient. Implementations report `Ok(false)`
//! for the configured degraded mode (no delivery credentials, code logged
//! instead); `Err` means a real attempt failed. Issuance treats both as
//! non-fatal: a verifiable code exists whether or not the email arrived.

use async_trait::async_trait;

use crate::otp::OtpCode;

#[async_trait]
pub trait OtpDeliveryPort: Send + Sync {
    /// Deliver `code` to `email`. Returns whether a delivery was actually
    /// performed.
    async fn deliver(&self, email: &str, code: &OtpCode) -> anyhow::Result<bool>;
}
