mod otp_challenge_repo;

pub use otp_challenge_repo::DieselOtpChallengeRepository;
