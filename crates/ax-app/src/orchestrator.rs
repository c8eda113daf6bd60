//! Auth session orchestrator.
//!
//! Single owner of the process-wide session state. Public operations capture
//! flow context, run the side effects the screens used to trigger, and drive
//! the pure state machine; every mutation goes through one dispatch lock, so
//! no two transitions can interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use ax_core::auth::{
    AuthAction, AuthError, AuthEvent, AuthFlow, AuthStage, AuthState, AuthStateMachine, TokenPair,
};
use ax_core::ports::{
    AppLifecycleState, AuthEventPort, BiometricError, BiometricGatePort, BiometricKind,
    CredentialGatewayPort, GatewayError,
};
use ax_core::SecretString;

use crate::context::AuthContext;
use crate::token_vault::TokenVault;
use crate::usecases::{BootstrapSession, IssueOtp, SignOutSession, VerifyOtp};

const SETUP_PROMPT: &str = "Confirm your identity to enable biometric sign-in";
const REENTRY_PROMPT: &str = "Verify your identity to continue";

/// What a successful OTP verification leads to.
#[derive(Debug)]
pub enum OtpVerification {
    /// Login flow: the real login ran and the session is live.
    SignedIn(AuthState),
    /// Signup flow: email ownership is proven, password creation is next.
    PasswordCreationRequired,
}

/// Result of account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub state: AuthState,
    /// False when the provider deferred session issuance to email
    /// confirmation; the account exists but nobody is signed in.
    pub session_issued: bool,
}

struct PendingLogin {
    email: String,
    password: SecretString,
}

struct PendingSignup {
    name: String,
    email: String,
    email_verified: bool,
}

/// Orchestrator that drives auth session state and side effects.
pub struct AuthOrchestrator {
    context: Arc<AuthContext>,

    pending_login: Mutex<Option<PendingLogin>>,
    pending_signup: Mutex<Option<PendingSignup>>,
    bootstrapped: AtomicBool,

    issue_otp: Arc<IssueOtp>,
    verify_otp: Arc<VerifyOtp>,
    bootstrap_session: Arc<BootstrapSession>,
    sign_out_session: Arc<SignOutSession>,
    gateway: Arc<dyn CredentialGatewayPort>,
    vault: Arc<TokenVault>,
    biometric: Arc<dyn BiometricGatePort>,
    auth_events: Arc<dyn AuthEventPort>,
}

impl AuthOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        issue_otp: Arc<IssueOtp>,
        verify_otp: Arc<VerifyOtp>,
        bootstrap_session: Arc<BootstrapSession>,
        sign_out_session: Arc<SignOutSession>,
        gateway: Arc<dyn CredentialGatewayPort>,
        vault: Arc<TokenVault>,
        biometric: Arc<dyn BiometricGatePort>,
        auth_events: Arc<dyn AuthEventPort>,
    ) -> Self {
        Self {
            context: AuthContext::initial().arc(),
            pending_login: Mutex::new(None),
            pending_signup: Mutex::new(None),
            bootstrapped: AtomicBool::new(false),
            issue_otp,
            verify_otp,
            bootstrap_session,
            sign_out_session,
            gateway,
            vault,
            biometric,
            auth_events,
        }
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> AuthState {
        self.context.get_state().await
    }

    /// Recover any prior session. Idempotent: a second call returns the
    /// current state without re-running recovery.
    pub async fn bootstrap(&self) -> Result<AuthState, AuthError> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return Ok(self.context.get_state().await);
        }

        let outcome = self.bootstrap_session.execute().await;
        self.dispatch(AuthEvent::BootstrapResolved {
            user: outcome.user,
            tokens: outcome.tokens,
            biometric_enabled: outcome.biometric_enabled,
        })
        .await
    }

    /// Start the login flow: check the password without creating a session,
    /// then issue the OTP challenge. The credentials are kept until the OTP
    /// gate passes.
    pub async fn begin_login(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<(), AuthError> {
        self.gateway
            .validate_credentials(email, &password)
            .await
            .map_err(credential_error)?;

        *self.pending_login.lock().await = Some(PendingLogin {
            email: email.to_owned(),
            password,
        });
        *self.pending_signup.lock().await = None;

        self.issue_otp.execute(email).await
    }

    /// Start the signup flow: OTP first (email-ownership proof), password
    /// creation only after the code verifies.
    pub async fn begin_signup(&self, name: &str, email: &str) -> Result<(), AuthError> {
        *self.pending_signup.lock().await = Some(PendingSignup {
            name: name.to_owned(),
            email: email.to_owned(),
            email_verified: false,
        });
        *self.pending_login.lock().await = None;

        self.issue_otp.execute(email).await
    }

    /// Re-send the code for whichever flow is pending. The fresh challenge
    /// overwrites the outstanding one.
    pub async fn resend_otp(&self) -> Result<(), AuthError> {
        let email = self
            .pending_email()
            .await
            .ok_or(AuthError::IllegalState("no verification in progress"))?;
        self.issue_otp.execute(&email).await
    }

    /// Verify the entered code and continue the pending flow.
    pub async fn verify_otp(&self, code: &str) -> Result<OtpVerification, AuthError> {
        if let Some(email) = self.pending_login_email().await {
            self.verify_otp.execute(&email, code).await?;

            let PendingLogin { email, password } = self
                .pending_login
                .lock()
                .await
                .take()
                .ok_or(AuthError::IllegalState("login flow vanished mid-verify"))?;

            let session = self
                .gateway
                .login(&email, &password)
                .await
                .map_err(credential_error)?;

            let biometric_enabled = match self.vault.is_biometric_enabled() {
                Ok(enabled) => enabled,
                Err(err) => {
                    warn!(error = %err, "could not read biometric flag; treating as disabled");
                    false
                }
            };

            let state = self
                .dispatch(AuthEvent::LoginSucceeded {
                    user: session.user,
                    tokens: TokenPair::new(session.access_token, session.refresh_token),
                    biometric_enabled,
                })
                .await?;
            return Ok(OtpVerification::SignedIn(state));
        }

        let mut pending_signup = self.pending_signup.lock().await;
        let Some(pending) = pending_signup.as_mut() else {
            return Err(AuthError::IllegalState("no verification in progress"));
        };
        let email = pending.email.clone();
        drop(pending_signup);

        self.verify_otp.execute(&email, code).await?;

        if let Some(pending) = self.pending_signup.lock().await.as_mut() {
            pending.email_verified = true;
        }
        Ok(OtpVerification::PasswordCreationRequired)
    }

    /// Finish the signup flow with the chosen password. Only legal once the
    /// signup email has been verified.
    pub async fn create_account(&self, password: SecretString) -> Result<SignupOutcome, AuthError> {
        let (name, email) = {
            let pending = self.pending_signup.lock().await;
            match pending.as_ref() {
                Some(p) if p.email_verified => (p.name.clone(), p.email.clone()),
                Some(_) => return Err(AuthError::IllegalState("signup email not verified")),
                None => return Err(AuthError::IllegalState("no signup in progress")),
            }
        };

        let created = self
            .gateway
            .create_account(&email, &password, &name)
            .await
            .map_err(|err| AuthError::AccountCreationFailed(err.to_string()))?;

        *self.pending_signup.lock().await = None;

        let tokens = TokenPair::from_issued(&created.access_token, &created.refresh_token);
        let session_issued = tokens.is_some();
        let state = self
            .dispatch(AuthEvent::AccountCreated {
                user: created.user,
                tokens,
            })
            .await?;

        Ok(SignupOutcome {
            state,
            session_issued,
        })
    }

    /// Run the biometric-setup prompt. Success persists the device flag and
    /// commits the session's biometric decision.
    pub async fn complete_biometric_setup(&self) -> Result<AuthState, AuthError> {
        self.require_stage(AuthStage::AwaitingBiometricSetup).await?;

        if !self.biometric.availability().await.is_usable() {
            return Err(AuthError::BiometricUnavailable);
        }

        self.biometric
            .challenge(SETUP_PROMPT)
            .await
            .map_err(biometric_error)?;
        self.dispatch(AuthEvent::BiometricSetupSucceeded).await
    }

    /// Explicitly skip biometric setup. On the signup path this abandons the
    /// whole session; on the login path the user proceeds to the main app.
    pub async fn skip_biometric_setup(&self) -> Result<AuthState, AuthError> {
        self.require_stage(AuthStage::AwaitingBiometricSetup).await?;
        self.dispatch(AuthEvent::BiometricSetupSkipped).await
    }

    /// Re-authenticate a restored session. The existing session is reused;
    /// nothing is refetched. A device whose biometrics became unusable since
    /// the flag was set waves the session through rather than locking the
    /// user out of their own account.
    pub async fn unlock_with_biometric(&self) -> Result<AuthState, AuthError> {
        self.require_stage(AuthStage::AwaitingBiometricReentry)
            .await?;

        if self.biometric.availability().await.is_usable() {
            self.biometric
                .challenge(REENTRY_PROMPT)
                .await
                .map_err(biometric_error)?;
        } else {
            warn!("biometrics no longer usable on this device; skipping re-entry prompt");
        }
        self.dispatch(AuthEvent::BiometricReentrySucceeded).await
    }

    /// Which kind of biometric the device offers, for display labels.
    pub async fn biometric_kind(&self) -> BiometricKind {
        self.biometric.classify().await
    }

    /// Explicit sign-out. Local teardown always completes, whatever the
    /// server says.
    pub async fn sign_out(&self) -> Result<AuthState, AuthError> {
        self.dispatch(AuthEvent::SignOutRequested).await
    }

    /// Consume the one-time post-signup navigation flag.
    pub async fn acknowledge_signup_completion(&self) -> Result<AuthState, AuthError> {
        self.dispatch(AuthEvent::SignupCompletionAcknowledged).await
    }

    /// Feed an app lifecycle transition into the machine. Suspension while
    /// the session has not committed a biometric decision tears it down.
    pub async fn notify_app_state(&self, state: AppLifecycleState) -> Result<AuthState, AuthError> {
        if !state.is_suspended() {
            return Ok(self.context.get_state().await);
        }
        debug!(?state, "app suspended; applying biometric-setup guard");
        self.dispatch(AuthEvent::AppSuspended).await
    }

    /// Which flow the outstanding OTP challenge belongs to, if any. Screens
    /// use this for flow-dependent copy ("verify your email" vs "verify
    /// your identity").
    pub async fn pending_flow(&self) -> Option<AuthFlow> {
        if self.pending_login.lock().await.is_some() {
            return Some(AuthFlow::Login);
        }
        if self.pending_signup.lock().await.is_some() {
            return Some(AuthFlow::Signup);
        }
        None
    }

    async fn pending_login_email(&self) -> Option<String> {
        self.pending_login
            .lock()
            .await
            .as_ref()
            .map(|p| p.email.clone())
    }

    async fn pending_email(&self) -> Option<String> {
        if let Some(email) = self.pending_login_email().await {
            return Some(email);
        }
        self.pending_signup
            .lock()
            .await
            .as_ref()
            .map(|p| p.email.clone())
    }

    async fn require_stage(&self, stage: AuthStage) -> Result<(), AuthError> {
        let current = self.context.get_state().await.stage;
        if current == stage {
            Ok(())
        } else {
            Err(AuthError::IllegalState("operation does not match the current stage"))
        }
    }

    async fn dispatch(&self, event: AuthEvent) -> Result<AuthState, AuthError> {
        // Serialize concurrent dispatch calls: the whole transition +
        // execute_actions + state update must run atomically.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.auth_orchestrator.dispatch", event = ?event);
        async {
            let mut current = self.context.get_state().await;
            let mut pending_events = vec![event];

            while let Some(event) = pending_events.pop() {
                let from = current.stage;
                let (next, actions) = AuthStateMachine::transition(current, event);
                info!(from = ?from, to = ?next.stage, "auth state transition");
                let follow_up_events = self.execute_actions(&next, actions).await?;
                self.context.set_state(next.clone()).await;
                self.auth_events.emit_auth_state_changed(next.clone()).await;
                current = next;
                pending_events.extend(follow_up_events);
            }

            Ok(current)
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        pending_state: &AuthState,
        actions: Vec<AuthAction>,
    ) -> Result<Vec<AuthEvent>, AuthError> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            debug!(?action, "auth executing action");
            match action {
                AuthAction::PersistTokens(tokens) => {
                    self.vault
                        .save_tokens(&tokens)
                        .map_err(|err| AuthError::Vault(err.to_string()))?;
                }
                AuthAction::PersistBiometricEnabled(enabled) => {
                    self.vault
                        .set_biometric_enabled(enabled)
                        .map_err(|err| AuthError::Vault(err.to_string()))?;
                }
                AuthAction::TearDownSession { reason } => {
                    info!(?reason, "tearing down session");
                    self.sign_out_session
                        .execute(pending_state.session.tokens.as_ref())
                        .await;
                    *self.pending_login.lock().await = None;
                    *self.pending_signup.lock().await = None;
                    follow_up_events.push(AuthEvent::SignedOut);
                }
            }
        }

        Ok(follow_up_events)
    }
}

fn credential_error(err: GatewayError) -> AuthError {
    match err {
        GatewayError::NoSession => AuthError::NoSession,
        other => AuthError::InvalidCredentials(other.to_string()),
    }
}

fn biometric_error(err: BiometricError) -> AuthError {
    match err {
        BiometricError::Unavailable => AuthError::BiometricUnavailable,
        BiometricError::Rejected => AuthError::BiometricFailed("prompt rejected".into()),
        BiometricError::Device(message) => AuthError::BiometricFailed(message),
    }
}
