//! # ax-core
//!
//! Core domain models and business logic for the Axys authentication session.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod auth;
pub mod otp;
pub mod ports;
pub mod security;

// Re-export commonly used types at the crate root
pub use auth::{
    AuthAction, AuthError, AuthEvent, AuthFlow, AuthStage, AuthState, AuthStateMachine, Session,
    TeardownReason, TokenPair, UserProfile,
};
pub use otp::{OtpChallenge, OtpCode, OTP_TTL_MS};
pub use security::SecretString;
