use std::collections::HashMap;

use sqlx::sqlite::SqliteConnection;
use tracing::info;

use crate::error::WalmetricsResult;
use crate::metrics::MetricRecord;
use crate::store::{create_table, fill_table};
use crate::types::{TableColumnDefinition, TableDefinition, TableName, Value};

/// Schema the output table is created in.
const OUTPUT_SCHEMA: &str = "public";

/// Derives a [`TableDefinition`] from a metric record's statically declared
/// shape.
///
/// The table is named from the record type, lower-cased; each field maps to a
/// column whose type comes from the fixed field-type translation table.
pub fn derive_table_definition<M>() -> TableDefinition
where
    M: MetricRecord,
{
    let columns = M::fields()
        .iter()
        .map(|field| {
            TableColumnDefinition::new(field.name.to_string(), field.typ.storage_type().to_string())
        })
        .collect();

    TableDefinition::new(
        TableName::new(OUTPUT_SCHEMA.to_string(), M::record_name().to_lowercase()),
        columns,
    )
}

/// Persists metric records into the durable store through the materializer
/// contract: derive the table definition, create the table if absent (a
/// warning and a no-op otherwise), then append one row per record.
pub async fn persist_metrics<M>(conn: &mut SqliteConnection, metrics: &[M]) -> WalmetricsResult<()>
where
    M: MetricRecord,
{
    let table = derive_table_definition::<M>();
    let rows: Vec<HashMap<String, Value>> = metrics.iter().map(MetricRecord::row).collect();

    create_table(conn, &table).await?;
    fill_table(conn, &table, &rows).await?;

    info!(table = %table.name, metrics = metrics.len(), "persisted metric records");

    Ok(())
}
