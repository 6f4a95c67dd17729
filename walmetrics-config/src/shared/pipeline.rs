use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Location of the WAL snapshot to ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalSourceConfig {
    /// Path to the snapshot JSON document.
    pub path: PathBuf,
}

/// Location of the durable output store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputStoreConfig {
    /// Path to the SQLite database file; created on first use.
    pub path: PathBuf,
}

/// Configuration for one pipeline pass.
///
/// The ephemeral store is always in-memory and needs no configuration; only
/// the snapshot source and the durable output target are configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// The WAL snapshot to ingest.
    pub wal: WalSourceConfig,
    /// The durable store receiving the extracted metrics.
    pub output: OutputStoreConfig,
}

impl PipelineConfig {
    /// Validates pipeline configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.wal.path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyWalPath);
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyOutputPath);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_paths() {
        let config = PipelineConfig {
            wal: WalSourceConfig { path: PathBuf::new() },
            output: OutputStoreConfig { path: PathBuf::from("metrics.db") },
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyWalPath)
        ));

        let config = PipelineConfig {
            wal: WalSourceConfig { path: PathBuf::from("wal.json") },
            output: OutputStoreConfig { path: PathBuf::new() },
        };

        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyOutputPath)
        ));
    }

    #[test]
    fn validate_accepts_populated_paths() {
        let config = PipelineConfig {
            wal: WalSourceConfig { path: PathBuf::from("wal.json") },
            output: OutputStoreConfig { path: PathBuf::from("metrics.db") },
        };

        config.validate().unwrap();
    }
}
