//! # ax-platform
//!
//! Platform-facing adapters: secure storage backends, the development
//! biometric gate and the app lifecycle broadcaster. Real device shells
//! (iOS/Android hosts) provide their own implementations of the same ports.

pub mod app_state;
pub mod auth_events;
pub mod biometric;
pub mod file_secure_storage;
pub mod memory_secure_storage;

pub use app_state::AppStateBroadcaster;
pub use auth_events::AuthStateBroadcaster;
pub use biometric::DevBiometricGate;
pub use file_secure_storage::FileSecureStorage;
pub use memory_secure_storage::MemorySecureStorage;
