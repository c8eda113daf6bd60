//! Development biometric gate.
//!
//! Device shells bridge the real platform biometric APIs into
//! `BiometricGatePort`; this adapter stands in for them in development,
//! headless and test environments, with scripted capability and prompt
//! outcomes.

use async_trait::async_trait;
use tracing::info;

use ax_core::ports::{BiometricAvailability, BiometricError, BiometricGatePort, BiometricKind};

/// Scripted result of the next prompt.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Succeed,
    Reject,
    DeviceError(String),
}

pub struct DevBiometricGate {
    availability: BiometricAvailability,
    kind: BiometricKind,
    outcome: ScriptedOutcome,
}

impl DevBiometricGate {
    /// A device with enrolled biometrics whose prompts succeed.
    pub fn enrolled(kind: BiometricKind) -> Self {
        Self {
            availability: BiometricAvailability {
                has_hardware: true,
                is_enrolled: true,
            },
            kind,
            outcome: ScriptedOutcome::Succeed,
        }
    }

    /// A device without usable biometrics.
    pub fn unavailable() -> Self {
        Self {
            availability: BiometricAvailability {
                has_hardware: false,
                is_enrolled: false,
            },
            kind: BiometricKind::Generic,
            outcome: ScriptedOutcome::Reject,
        }
    }

    /// Override what the next prompt reports.
    pub fn with_outcome(mut self, outcome: ScriptedOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

#[async_trait]
impl BiometricGatePort for DevBiometricGate {
    async fn availability(&self) -> BiometricAvailability {
        self.availability
    }

    async fn classify(&self) -> BiometricKind {
        self.kind
    }

    async fn challenge(&self, prompt: &str) -> Result<(), BiometricError> {
        if !self.availability.is_usable() {
            return Err(BiometricError::Unavailable);
        }
        info!(prompt, kind = self.kind.label(), "scripted biometric prompt");
        match &self.outcome {
            ScriptedOutcome::Succeed => Ok(()),
            ScriptedOutcome::Reject => Err(BiometricError::Rejected),
            ScriptedOutcome::DeviceError(message) => {
                Err(BiometricError::Device(message.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enrolled_gate_passes_its_prompt() {
        let gate = DevBiometricGate::enrolled(BiometricKind::FaceRecognition);
        assert!(gate.availability().await.is_usable());
        assert_eq!(gate.classify().await.label(), "Face ID");
        gate.challenge("unlock").await.unwrap();
    }

    #[tokio::test]
    async fn unavailable_gate_refuses_to_prompt() {
        let gate = DevBiometricGate::unavailable();
        assert!(!gate.availability().await.is_usable());
        assert!(matches!(
            gate.challenge("unlock").await,
            Err(BiometricError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn scripted_rejection_surfaces_as_rejected() {
        let gate = DevBiometricGate::enrolled(BiometricKind::Fingerprint)
            .with_outcome(ScriptedOutcome::Reject);
        assert!(matches!(
            gate.challenge("unlock").await,
            Err(BiometricError::Rejected)
        ));
    }
}
