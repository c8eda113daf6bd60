//! Biometric gate port
//!
//! Abstraction over the device-native biometric APIs: hardware/enrollment
//! probing, supported-type classification (display labeling only) and a
//! single modal challenge. The gate is independent of any session state.

use async_trait::async_trait;
use thiserror::Error;

/// Device capability snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiometricAvailability {
    pub has_hardware: bool,
    pub is_enrolled: bool,
}

impl BiometricAvailability {
    pub fn is_usable(&self) -> bool {
        self.has_hardware && self.is_enrolled
    }
}

/// Kind of biometric the device reports, used only for display labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BiometricKind {
    FaceRecognition,
    Fingerprint,
    Iris,
    Generic,
}

impl BiometricKind {
    /// The user-facing label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            BiometricKind::FaceRecognition => "Face ID",
            BiometricKind::Fingerprint => "Touch ID",
            BiometricKind::Iris => "Iris",
            BiometricKind::Generic => "Biometric",
        }
    }
}

#[derive(Debug, Error)]
pub enum BiometricError {
    /// No hardware, or nothing enrolled.
    #[error("biometric hardware unavailable or not enrolled")]
    Unavailable,

    /// The user failed or dismissed the prompt.
    #[error("biometric prompt rejected")]
    Rejected,

    /// The device reported an error while prompting.
    #[error("biometric device error: {0}")]
    Device(String),
}

#[async_trait]
pub trait BiometricGatePort: Send + Sync {
    /// Query hardware presence and enrollment.
    async fn availability(&self) -> BiometricAvailability;

    /// Classify the strongest supported authentication type.
    async fn classify(&self) -> BiometricKind;

    /// Run a single blocking device prompt. Never retried automatically;
    /// retry is a caller-level user action.
    async fn challenge(&self, prompt: &str) -> Result<(), BiometricError>;
}
