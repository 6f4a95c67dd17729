//! WAL metrics loader service binary.
//!
//! Loads configuration, initializes tracing, and runs one pipeline pass:
//! ingest the configured WAL snapshot and persist the extracted metrics into
//! the durable output store. Any failure aborts the process with a non-zero
//! status and a descriptive error.

use tracing::error;
use walmetrics_config::shared::LoaderConfig;

use crate::config::load_loader_config;
use crate::core::start_loader_with_config;
use crate::error::{LoaderError, LoaderResult};

mod config;
mod core;
mod error;

/// Entry point for the loader service.
///
/// Loads configuration, initializes tracing, starts the async runtime, and
/// runs the pipeline. The runtime is current-thread: one pass is a strictly
/// sequential batch job.
fn main() -> LoaderResult<()> {
    let loader_config = load_loader_config()?;

    walmetrics_telemetry::init_tracing(env!("CARGO_BIN_NAME")).map_err(LoaderError::config)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main(loader_config))?;

    Ok(())
}

/// Main async entry point that runs the pipeline and reports failures.
async fn async_main(loader_config: LoaderConfig) -> LoaderResult<()> {
    if let Err(err) = start_loader_with_config(loader_config).await {
        error!("{err}");
        return Err(err.into());
    }

    Ok(())
}
