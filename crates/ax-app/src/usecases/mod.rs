pub mod bootstrap_session;
pub mod issue_otp;
pub mod sign_out;
pub mod verify_otp;

pub use bootstrap_session::{BootstrapOutcome, BootstrapSession};
pub use issue_otp::IssueOtp;
pub use sign_out::SignOutSession;
pub use verify_otp::VerifyOtp;
