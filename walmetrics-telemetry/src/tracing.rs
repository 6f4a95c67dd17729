use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Initializes the global tracing subscriber for a service binary.
///
/// The filter honors `RUST_LOG`, falling back to `info`. Call this once,
/// before the async runtime starts; a second call fails because the global
/// subscriber is already installed.
pub fn init_tracing(service_name: &str) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .try_init()?;

    tracing::info!(service = service_name, "tracing initialized");

    Ok(())
}

/// Initializes tracing for tests, capturing output per test.
///
/// Safe to call from every test; repeated initialization attempts are
/// ignored.
pub fn init_test_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}
