//! One-time passcode domain model.

mod challenge;
mod code;

pub use challenge::{OtpChallenge, OTP_TTL_MS};
pub use code::OtpCode;
