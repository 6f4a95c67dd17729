//! WAL snapshot decoding.
//!
//! Parses the batch-of-batches JSON envelope produced by the change-capture
//! tool into a flat, ordered sequence of [`ChangeRecord`]s. Ordering is
//! preserved across batches and within a batch because the downstream schema
//! fold and row grouping are order-sensitive.

mod decoder;

pub use decoder::{parse_wal_snapshot, read_wal_snapshot};

use std::fmt;

use crate::types::{TableName, Value};

/// The operation kind of a change record. Only inserts are supported; the
/// decoder rejects every other kind before any store is touched.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ChangeKind {
    Insert,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Insert => f.write_str("insert"),
        }
    }
}

/// One captured mutation from the WAL snapshot.
///
/// The three column sequences are parallel: position `i` of `column_names`,
/// `column_types` and `column_values` all describe the same column. The
/// decoder enforces equal lengths at construction, so consumers may zip them
/// freely.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    /// The operation kind that produced this record.
    pub kind: ChangeKind,
    /// The schema of the mutated table.
    pub schema: String,
    /// The name of the mutated table.
    pub table: String,
    /// Column names, in the order the source declared them.
    pub column_names: Vec<String>,
    /// Declared source types, one per column.
    pub column_types: Vec<String>,
    /// Captured values, one per column.
    pub column_values: Vec<Value>,
}

impl ChangeRecord {
    /// Returns the fully qualified name of the table this record mutates.
    pub fn table_name(&self) -> TableName {
        TableName::new(self.schema.clone(), self.table.clone())
    }

    /// Returns the composite table key for this record.
    pub fn key(&self) -> String {
        self.table_name().key()
    }
}
