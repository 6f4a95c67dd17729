use std::path::Path;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use tracing::debug;

use crate::error::{ErrorKind, WalmetricsResult};
use crate::walmetrics_error;

/// Opens the ephemeral store: an in-memory SQLite database scoped to one
/// pipeline run. Nothing loaded into it survives the connection.
pub async fn connect_ephemeral() -> WalmetricsResult<SqliteConnection> {
    debug!("opening ephemeral store");

    SqliteConnectOptions::new()
        .in_memory(true)
        .connect()
        .await
        .map_err(|err| {
            walmetrics_error!(
                ErrorKind::StoreConnectionFailed,
                "failed to open ephemeral store",
                source: err
            )
        })
}

/// Opens the durable store at `path`, creating the database file on first
/// use. Its prior contents are never touched by the pipeline except for
/// appending to the metrics table.
pub async fn connect_durable(path: &Path) -> WalmetricsResult<SqliteConnection> {
    debug!(path = %path.display(), "opening durable store");

    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .connect()
        .await
        .map_err(|err| {
            walmetrics_error!(
                ErrorKind::StoreConnectionFailed,
                "failed to open durable store",
                path.display(),
                source: err
            )
        })
}
