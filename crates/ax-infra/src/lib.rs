//! # ax-infra
//!
//! Infrastructure adapters for the Axys auth stack: the Diesel/SQLite OTP
//! challenge store with its in-memory fallback, the identity-provider HTTP
//! gateway, the transactional email client and the system clock.

pub mod db;
pub mod email;
pub mod identity;
pub mod otp;
pub mod time;

pub use db::pool::{init_db_pool, DbPool};
pub use email::SendGridMailer;
pub use identity::HttpCredentialGateway;
pub use otp::{FallbackOtpChallengeStore, MemoryOtpChallengeStore};
pub use time::SystemClock;
