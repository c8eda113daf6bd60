//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the core business logic to remain independent of
//! external dependencies.

pub mod app_state;
pub mod auth_events;
pub mod biometric;
mod clock;
pub mod credential_gateway;
pub mod otp_delivery;
pub mod otp_repository;
pub mod secure_storage;

pub use clock::*;

pub use app_state::{AppLifecycleState, AppStateEventsPort};
pub use auth_events::AuthEventPort;
pub use biometric::{BiometricAvailability, BiometricError, BiometricGatePort, BiometricKind};
pub use credential_gateway::{CreatedAccount, CredentialGatewayPort, GatewayError, ProviderSession};
pub use otp_delivery::OtpDeliveryPort;
pub use otp_repository::{OtpChallengeRepositoryPort, OtpStoreError};
pub use secure_storage::{SecureStorageError, SecureStoragePort};
