//! Authentication session state machine.
//!
//! Defines a pure state transition function over the session; side effects
//! live behind the actions the transitions emit.

use super::{AuthAction, AuthEvent, Session, TeardownReason};

/// Conceptual stage of the authentication session.
///
/// 认证会话所处的概念阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthStage {
    /// Initial session recovery has not finished yet.
    Unbootstrapped,
    /// No authenticated user.
    Unauthenticated,
    /// A restored session must pass the biometric re-entry prompt before the
    /// main app.
    AwaitingBiometricReentry,
    /// An authenticated session must pass the biometric-setup decision point
    /// (complete or explicitly skip) before the main app.
    AwaitingBiometricSetup,
    /// The user is allowed into the main app.
    Ready,
}

/// Full machine state: the stage plus the session fields it governs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthState {
    pub stage: AuthStage,
    pub session: Session,
}

impl AuthState {
    /// The state every process starts from: an empty, unbootstrapped session.
    pub fn initial() -> Self {
        Self {
            stage: AuthStage::Unbootstrapped,
            session: Session::default(),
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Pure auth state machine.
///
/// 纯状态机：不包含副作用。
pub struct AuthStateMachine;

impl AuthStateMachine {
    pub fn transition(state: AuthState, event: AuthEvent) -> (AuthState, Vec<AuthAction>) {
        use AuthStage::*;

        let AuthState { stage, mut session } = state;

        match (stage, event) {
            (
                Unbootstrapped,
                AuthEvent::BootstrapResolved {
                    user,
                    tokens,
                    biometric_enabled,
                },
            ) => {
                session.bootstrap_done = true;
                match (user, tokens) {
                    (Some(user), Some(tokens)) => {
                        session.user = Some(user);
                        session.tokens = Some(tokens);
                        // The restored session inherits the device's biometric
                        // decision; a device without the flag re-enters setup
                        // gating instead of the re-entry prompt.
                        session.biometric_setup_completed = biometric_enabled;
                        session.show_biometric_login = biometric_enabled;
                        let stage = if biometric_enabled {
                            AwaitingBiometricReentry
                        } else {
                            Ready
                        };
                        (AuthState { stage, session }, Vec::new())
                    }
                    _ => (
                        AuthState {
                            stage: Unauthenticated,
                            session,
                        },
                        Vec::new(),
                    ),
                }
            }

            (
                Unauthenticated,
                AuthEvent::LoginSucceeded {
                    user,
                    tokens,
                    biometric_enabled,
                },
            ) => {
                session.user = Some(user);
                session.tokens = Some(tokens.clone());
                session.show_biometric_login = false;
                session.biometric_setup_completed = biometric_enabled;
                session.just_completed_signup = false;
                let stage = if biometric_enabled {
                    Ready
                } else {
                    AwaitingBiometricSetup
                };
                (
                    AuthState { stage, session },
                    vec![AuthAction::PersistTokens(tokens)],
                )
            }

            (Unauthenticated, AuthEvent::AccountCreated { user, tokens }) => {
                match (user, tokens) {
                    (Some(user), Some(tokens)) => {
                        session.user = Some(user);
                        session.tokens = Some(tokens.clone());
                        session.show_biometric_login = false;
                        session.biometric_setup_completed = false;
                        // A fresh signup must pass the biometric decision
                        // point exactly once before Ready.
                        session.just_completed_signup = true;
                        (
                            AuthState {
                                stage: AwaitingBiometricSetup,
                                session,
                            },
                            vec![AuthAction::PersistTokens(tokens)],
                        )
                    }
                    // Account created, session deferred to email
                    // confirmation: not authenticated.
                    _ => (
                        AuthState {
                            stage: Unauthenticated,
                            session,
                        },
                        Vec::new(),
                    ),
                }
            }

            (AwaitingBiometricSetup, AuthEvent::BiometricSetupSucceeded) => {
                session.biometric_setup_completed = true;
                (
                    AuthState {
                        stage: Ready,
                        session,
                    },
                    vec![AuthAction::PersistBiometricEnabled(true)],
                )
            }

            (AwaitingBiometricSetup, AuthEvent::BiometricSetupSkipped) => {
                if session.just_completed_signup {
                    // Signup path: skipping abandons the session entirely.
                    (
                        AuthState {
                            stage: AwaitingBiometricSetup,
                            session,
                        },
                        vec![AuthAction::TearDownSession {
                            reason: TeardownReason::BiometricSetupAbandoned,
                        }],
                    )
                } else {
                    // Login path: the session is kept and the user proceeds.
                    // `biometric_setup_completed` stays false, so the
                    // suspension guard still applies to this session.
                    (
                        AuthState {
                            stage: Ready,
                            session,
                        },
                        Vec::new(),
                    )
                }
            }

            (AwaitingBiometricReentry, AuthEvent::BiometricReentrySucceeded) => {
                // The existing session is reused; no identity or token
                // refetch.
                session.show_biometric_login = false;
                (
                    AuthState {
                        stage: Ready,
                        session,
                    },
                    Vec::new(),
                )
            }

            (stage, AuthEvent::AppSuspended) => {
                let must_tear_down =
                    session.is_authenticated() && !session.biometric_setup_completed;
                let actions = if must_tear_down {
                    vec![AuthAction::TearDownSession {
                        reason: TeardownReason::SuspendedWithoutBiometricSetup,
                    }]
                } else {
                    Vec::new()
                };
                (AuthState { stage, session }, actions)
            }

            (stage, AuthEvent::SignOutRequested) => {
                let actions = if session.is_authenticated() {
                    vec![AuthAction::TearDownSession {
                        reason: TeardownReason::UserRequested,
                    }]
                } else {
                    Vec::new()
                };
                (AuthState { stage, session }, actions)
            }

            (_, AuthEvent::SignedOut) => {
                session.clear_authenticated_state();
                (
                    AuthState {
                        stage: Unauthenticated,
                        session,
                    },
                    Vec::new(),
                )
            }

            (Ready, AuthEvent::SignupCompletionAcknowledged) => {
                session.just_completed_signup = false;
                (
                    AuthState {
                        stage: Ready,
                        session,
                    },
                    Vec::new(),
                )
            }

            (stage, _event) => (AuthState { stage, session }, Vec::new()),
        }
    }
}
