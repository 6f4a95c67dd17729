//! Schema inference and row grouping.
//!
//! Both operations are pure folds over the decoded change-record sequence.
//! Their accumulators are insertion-ordered (an entries vector plus a
//! key→index lookup) so that iterating them visits tables in first-seen
//! order and a given input sequence always produces the same output.

use std::collections::HashMap;
use std::mem;

use crate::types::{TableDefinition, TableRow};
use crate::wal::ChangeRecord;

/// The inferred schema of one snapshot: composite table key → table
/// definition, in first-seen order.
#[derive(Debug, Default)]
pub struct SchemaMap {
    entries: Vec<TableDefinition>,
    index: HashMap<String, usize>,
}

impl SchemaMap {
    pub fn new() -> SchemaMap {
        Self::default()
    }

    /// Inserts a table definition unless its key is already present.
    ///
    /// Returns `true` if the definition was inserted. Later definitions for
    /// an existing key are ignored, columns included (first-seen-wins).
    fn insert_first_seen(&mut self, table: TableDefinition) -> bool {
        let key = table.key();
        if self.index.contains_key(&key) {
            return false;
        }

        self.index.insert(key, self.entries.len());
        self.entries.push(table);
        true
    }

    /// Returns the table definition stored for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&TableDefinition> {
        self.index.get(key).map(|&at| &self.entries[at])
    }

    /// Iterates the table definitions in first-seen order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDefinition> {
        self.entries.iter()
    }

    /// Returns the number of distinct tables in the schema.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no tables have been inferred.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Folds the record sequence into a [`SchemaMap`] with first-seen-wins merge
/// semantics.
///
/// Column differences between later records and the stored definition for the
/// same table key are dropped, not merged. That mirrors the source system's
/// behavior and is part of the observable contract.
pub fn infer_schema(records: &[ChangeRecord]) -> SchemaMap {
    let mut schema = SchemaMap::new();

    for record in records {
        schema.insert_first_seen(TableDefinition::from_record(record));
    }

    schema
}

/// Decoded rows partitioned by composite table key, in first-seen table
/// order; rows within a group keep input order.
#[derive(Debug, Default)]
pub struct TableRowGroups {
    entries: Vec<(String, Vec<TableRow>)>,
    index: HashMap<String, usize>,
}

impl TableRowGroups {
    pub fn new() -> TableRowGroups {
        Self::default()
    }

    /// Appends a row to the group for `key`, creating the group on first use.
    fn push(&mut self, key: String, row: TableRow) {
        match self.index.get(&key) {
            Some(&at) => self.entries[at].1.push(row),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![row]));
            }
        }
    }

    /// Returns the rows grouped under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&[TableRow]> {
        self.index.get(key).map(|&at| self.entries[at].1.as_slice())
    }

    /// Takes the rows grouped under `key`, leaving an empty group behind.
    pub fn take(&mut self, key: &str) -> Option<Vec<TableRow>> {
        self.index
            .get(key)
            .map(|&at| mem::take(&mut self.entries[at].1))
    }

    /// Iterates the groups in first-seen table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TableRow])> {
        self.entries
            .iter()
            .map(|(key, rows)| (key.as_str(), rows.as_slice()))
    }

    /// Returns the number of distinct table groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no rows have been grouped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Folds the record sequence into per-table row groups.
///
/// The grouping key is recomputed per record with the same derivation used by
/// [`infer_schema`], so every row lands in the group of its inferred table.
pub fn group_rows(records: &[ChangeRecord]) -> TableRowGroups {
    let mut groups = TableRowGroups::new();

    for record in records {
        groups.push(record.key(), TableRow::from_record(record));
    }

    groups
}
