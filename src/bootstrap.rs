//! Composition root.
//!
//! Assembles concrete adapters into the auth stack the embedding shell
//! talks to. This constructor is the dependency manifest: everything the
//! orchestrator needs is built here, once, at startup.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use ax_app::usecases::{BootstrapSession, IssueOtp, SignOutSession, VerifyOtp};
use ax_app::{AppStateWatcher, AuthOrchestrator, TokenVault};
use ax_core::ports::{BiometricGatePort, BiometricKind, ClockPort};
use ax_infra::db::repositories::DieselOtpChallengeRepository;
use ax_infra::email::EmailSender;
use ax_infra::{
    init_db_pool, FallbackOtpChallengeStore, HttpCredentialGateway, SendGridMailer, SystemClock,
};
use ax_platform::{
    AppStateBroadcaster, AuthStateBroadcaster, DevBiometricGate, FileSecureStorage,
};

use crate::config::AppConfig;

/// The wired auth stack.
///
/// Keep this alive for the whole process: dropping it detaches the
/// app-state watcher.
pub struct AuthStack {
    pub orchestrator: Arc<AuthOrchestrator>,
    /// The embedding shell pushes foreground/background transitions here.
    pub app_state: Arc<AppStateBroadcaster>,
    /// UI observers subscribe here for committed session snapshots.
    pub auth_events: Arc<AuthStateBroadcaster>,
    _watcher: AppStateWatcher,
}

/// Build the auth stack from configuration, with the development biometric
/// gate. Device shells call [`build_auth_stack_with_biometrics`] instead and
/// pass their bridged gate.
pub async fn build_auth_stack(config: &AppConfig) -> anyhow::Result<AuthStack> {
    let gate = DevBiometricGate::enrolled(BiometricKind::Generic);
    build_auth_stack_with_biometrics(config, Arc::new(gate)).await
}

pub async fn build_auth_stack_with_biometrics(
    config: &AppConfig,
    biometric: Arc<dyn BiometricGatePort>,
) -> anyhow::Result<AuthStack> {
    let data_dir = config.data_dir()?;
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

    // Vault over the platform secure storage.
    let storage = FileSecureStorage::new_in_app_data_root(data_dir.clone())
        .context("failed to initialize secure storage")?;
    let vault = Arc::new(TokenVault::new(Arc::new(storage)));

    // Durable OTP store with its in-memory fallback.
    let database_url = data_dir.join("axys.sqlite");
    let pool = init_db_pool(
        database_url
            .to_str()
            .context("database path is not valid utf-8")?,
    )?;
    let otp_repository = Arc::new(FallbackOtpChallengeStore::new(Arc::new(
        DieselOtpChallengeRepository::new(pool),
    )));

    let delivery = Arc::new(SendGridMailer::new(
        config.email.api_key.clone(),
        EmailSender {
            email: config.email.from_email.clone(),
            name: config.email.from_name.clone(),
        },
    ));

    let gateway = Arc::new(HttpCredentialGateway::new(
        config.identity.url.clone(),
        config.identity.api_key.clone(),
    )?);

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let auth_events = Arc::new(AuthStateBroadcaster::new());

    let orchestrator = Arc::new(AuthOrchestrator::new(
        Arc::new(IssueOtp::new(
            otp_repository.clone(),
            delivery,
            clock.clone(),
        )),
        Arc::new(VerifyOtp::new(otp_repository, clock.clone())),
        Arc::new(BootstrapSession::with_min_splash(
            gateway.clone(),
            vault.clone(),
            clock,
            Duration::from_millis(config.bootstrap.min_splash_ms),
        )),
        Arc::new(SignOutSession::new(gateway.clone(), vault.clone())),
        gateway,
        vault,
        biometric,
        auth_events.clone(),
    ));

    let app_state = Arc::new(AppStateBroadcaster::new());
    let watcher = AppStateWatcher::attach(orchestrator.clone(), app_state.clone());

    Ok(AuthStack {
        orchestrator,
        app_state,
        auth_events,
        _watcher: watcher,
    })
}
