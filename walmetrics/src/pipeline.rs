use sqlx::Connection;
use tracing::info;
use walmetrics_config::shared::PipelineConfig;

use crate::bail;
use crate::error::{ErrorKind, WalmetricsResult};
use crate::metrics::{MetricsExtractor, persist_metrics};
use crate::schema::{group_rows, infer_schema};
use crate::store::{connect_durable, connect_ephemeral, create_table, fill_table};
use crate::wal::read_wal_snapshot;

/// One bounded pass over a WAL snapshot: decode, infer the schema, load the
/// ephemeral store, extract metrics, persist them to the durable store.
///
/// The pipeline is generic over its [`MetricsExtractor`], the pluggable seam
/// between the loaded change data and the output sink. Everything runs
/// strictly sequentially: no spawned tasks, no retries, and any failure
/// aborts the run.
#[derive(Debug)]
pub struct Pipeline<E> {
    config: PipelineConfig,
    extractor: E,
}

impl<E> Pipeline<E>
where
    E: MetricsExtractor,
{
    pub fn new(config: PipelineConfig, extractor: E) -> Self {
        Self { config, extractor }
    }

    /// Runs the pipeline to completion.
    ///
    /// The ephemeral store lives only for the extraction; the durable store
    /// is opened afterwards and only ever gains rows. Connections close on
    /// drop on failure paths and are closed explicitly on success.
    pub async fn run(self) -> WalmetricsResult<()> {
        info!(wal = %self.config.wal.path.display(), "reading records from WAL snapshot");
        let records = read_wal_snapshot(&self.config.wal.path)?;

        info!(records = records.len(), "generating store schema from WAL records");
        let schema = infer_schema(&records);
        let mut rows_by_table = group_rows(&records);

        info!(tables = schema.len(), "filling ephemeral store");
        let mut ephemeral = connect_ephemeral().await?;
        for table in schema.tables() {
            create_table(&mut ephemeral, table).await?;

            let rows = rows_by_table.take(&table.key()).unwrap_or_default();
            fill_table(&mut ephemeral, table, &rows).await?;
        }

        let metrics = self.extractor.extract(&mut ephemeral).await?;
        ephemeral.close().await?;

        if metrics.is_empty() {
            bail!(
                ErrorKind::EmptyExtraction,
                "metric extraction produced no records, nothing to write"
            );
        }

        info!(metrics = metrics.len(), "persisting metric records to durable store");
        let mut durable = connect_durable(&self.config.output.path).await?;
        persist_metrics(&mut durable, &metrics).await?;
        durable.close().await?;

        info!(output = %self.config.output.path.display(), "metrics loaded to output store");

        Ok(())
    }
}
