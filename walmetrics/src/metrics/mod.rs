//! Metric extraction and persistence.
//!
//! The pipeline does not own the analytical query. It guarantees a populated
//! store connection and delegates to a [`MetricsExtractor`]; whatever records
//! come back are persisted through the materializer by the sink, using the
//! record's statically declared shape.

mod common;
mod sink;

pub use common::{CommonMetric, CommonMetricsExtractor};
pub use sink::{derive_table_definition, persist_metrics};

use std::collections::HashMap;
use std::future::Future;

use sqlx::sqlite::SqliteConnection;

use crate::error::WalmetricsResult;
use crate::types::Value;

/// Storage-facing type of one metric record field.
///
/// This is the fixed translation table from a record field's native type to a
/// storage column type name. It is consulted only when deriving a table
/// definition from a record shape; WAL-inferred tables keep their declared
/// type strings verbatim.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FieldType {
    Boolean,
    Integer,
    Real,
    Text,
    Timestamp,
}

impl FieldType {
    /// Returns the storage column type name for this field type.
    pub fn storage_type(self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Timestamp => "timestamp",
        }
    }
}

/// One field of a metric record's statically declared shape.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// The field (and output column) name.
    pub name: &'static str,
    /// The field's storage-facing type.
    pub typ: FieldType,
}

/// Statically declared shape of a metric record.
///
/// The ordered field-descriptor list replaces runtime introspection of the
/// record type: the sink derives the output table definition from it and
/// projects each record into a column-name→value row through [`Self::row`].
pub trait MetricRecord {
    /// The record type's name; the output table is named from it, lower-cased.
    fn record_name() -> &'static str;

    /// The record's fields, in output column order.
    fn fields() -> &'static [FieldDescriptor];

    /// Projects this record into a column-name→value row.
    ///
    /// The returned map must carry one entry per descriptor in
    /// [`Self::fields`]; a missing entry surfaces as a binding error during
    /// fill.
    fn row(&self) -> HashMap<String, Value>;
}

/// The extraction seam between the loaded ephemeral store and the output
/// sink.
///
/// Implementations run their analytical query against the populated
/// connection and map result rows into typed records. The pipeline treats an
/// empty result as a hard failure, so extractors do not need to.
pub trait MetricsExtractor {
    /// The record type this extractor produces.
    type Record: MetricRecord;

    /// Extracts metric records from the populated store.
    fn extract(
        &self,
        conn: &mut SqliteConnection,
    ) -> impl Future<Output = WalmetricsResult<Vec<Self::Record>>>;
}
