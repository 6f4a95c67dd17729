use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ErrorKind, WalmetricsResult};
use crate::types::Value;
use crate::wal::{ChangeKind, ChangeRecord};
use crate::{bail, walmetrics_error};

/// The only operation kind the pipeline supports.
const INSERT_KIND: &str = "insert";

/// Wire shape of one batch in the snapshot: an object holding the ordered
/// change list for that batch.
#[derive(Debug, Deserialize)]
struct WalBatch {
    change: Vec<WalChange>,
}

/// Wire shape of a single change object, field names as emitted by the
/// change-capture tool.
#[derive(Debug, Deserialize)]
struct WalChange {
    kind: String,
    schema: String,
    table: String,
    columnnames: Vec<String>,
    columntypes: Vec<String>,
    columnvalues: Vec<Value>,
}

impl WalChange {
    /// Converts the wire object into a validated [`ChangeRecord`].
    ///
    /// Fails when the operation kind is not `insert` or when the three
    /// parallel column sequences disagree in length. `index` is the record's
    /// position in the flattened snapshot, carried into error detail.
    fn into_record(self, index: usize) -> WalmetricsResult<ChangeRecord> {
        if self.kind != INSERT_KIND {
            bail!(
                ErrorKind::UnsupportedChangeKind,
                "only insert WAL records are supported",
                format!(
                    "record {index} for table {}.{} has kind '{}'",
                    self.schema, self.table, self.kind
                )
            );
        }

        if self.columnnames.len() != self.columntypes.len()
            || self.columnnames.len() != self.columnvalues.len()
        {
            bail!(
                ErrorKind::InvalidData,
                "change record column sequences have mismatched lengths",
                format!(
                    "record {index} for table {}.{} has {} names, {} types, {} values",
                    self.schema,
                    self.table,
                    self.columnnames.len(),
                    self.columntypes.len(),
                    self.columnvalues.len()
                )
            );
        }

        Ok(ChangeRecord {
            kind: ChangeKind::Insert,
            schema: self.schema,
            table: self.table,
            column_names: self.columnnames,
            column_types: self.columntypes,
            column_values: self.columnvalues,
        })
    }
}

/// Parses a WAL snapshot payload into an ordered sequence of change records.
///
/// The whole decode aborts on the first invalid record; nothing downstream
/// sees a partially validated sequence.
pub fn parse_wal_snapshot(payload: &str) -> WalmetricsResult<Vec<ChangeRecord>> {
    let batches: Vec<WalBatch> = serde_json::from_str(payload)?;

    debug!(batches = batches.len(), "parsed WAL snapshot envelope");

    batches
        .into_iter()
        .flat_map(|batch| batch.change)
        .enumerate()
        .map(|(index, change)| change.into_record(index))
        .collect()
}

/// Reads and parses the WAL snapshot at `path`.
pub fn read_wal_snapshot(path: &Path) -> WalmetricsResult<Vec<ChangeRecord>> {
    let payload = std::fs::read_to_string(path).map_err(|err| {
        walmetrics_error!(
            ErrorKind::IoError,
            "failed to read WAL snapshot file",
            path.display(),
            source: err
        )
    })?;

    parse_wal_snapshot(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ordered_records_across_batches() {
        let payload = r#"[
            {"change": [
                {"kind": "insert", "schema": "public", "table": "orders",
                 "columnnames": ["id", "amount"], "columntypes": ["int", "real"],
                 "columnvalues": [1, 9.5]}
            ]},
            {"change": [
                {"kind": "insert", "schema": "public", "table": "orders",
                 "columnnames": ["id", "amount"], "columntypes": ["int", "real"],
                 "columnvalues": [2, 3.0]},
                {"kind": "insert", "schema": "public", "table": "customers",
                 "columnnames": ["id"], "columntypes": ["int"],
                 "columnvalues": [7]}
            ]}
        ]"#;

        let records = parse_wal_snapshot(payload).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].key(), "public.orders");
        assert_eq!(records[0].column_values, vec![Value::Integer(1), Value::Real(9.5)]);
        assert_eq!(records[1].column_values, vec![Value::Integer(2), Value::Real(3.0)]);
        assert_eq!(records[2].key(), "public.customers");
    }

    #[test]
    fn rejects_non_insert_kind() {
        let payload = r#"[
            {"change": [
                {"kind": "update", "schema": "public", "table": "orders",
                 "columnnames": ["id"], "columntypes": ["int"], "columnvalues": [1]}
            ]}
        ]"#;

        let err = parse_wal_snapshot(payload).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedChangeKind);
        assert!(err.detail().unwrap().contains("update"));
        assert!(err.detail().unwrap().contains("public.orders"));
    }

    #[test]
    fn rejects_mismatched_column_sequences() {
        let payload = r#"[
            {"change": [
                {"kind": "insert", "schema": "public", "table": "orders",
                 "columnnames": ["id", "amount"], "columntypes": ["int"],
                 "columnvalues": [1, 9.5]}
            ]}
        ]"#;

        let err = parse_wal_snapshot(payload).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.detail().unwrap().contains("2 names, 1 types, 2 values"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_wal_snapshot("{not json").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DeserializationError);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_wal_snapshot(Path::new("/nonexistent/wal.json")).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::IoError);
        assert!(err.detail().unwrap().contains("/nonexistent/wal.json"));
    }
}
