use tracing_subscriber::EnvFilter;

/// Install the process-wide tracing subscriber. `RUST_LOG` wins; the
/// default keeps the auth stack at info.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
