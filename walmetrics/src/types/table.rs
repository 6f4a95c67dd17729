use std::collections::HashMap;
use std::fmt;

use crate::types::Value;
use crate::wal::ChangeRecord;

/// A fully qualified table name consisting of a schema and table name.
///
/// The composite key `schema.table` is the unique identifier for a table
/// definition: schema-map lookups and row-grouping keys are both derived from
/// it, so the derivation must stay identical everywhere.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TableName {
    /// The schema name containing the table.
    pub schema: String,
    /// The name of the table within the schema.
    pub name: String,
}

impl TableName {
    pub fn new(schema: String, name: String) -> TableName {
        Self { schema, name }
    }

    /// Returns the deterministic composite key for this table name.
    pub fn key(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{0}.{1}", self.schema, self.name))
    }
}

/// The definition of a single column: name plus declared type string.
///
/// For WAL-inferred tables the type string is the source type system's type
/// name, carried verbatim; for sink-derived tables it is a storage type name
/// produced by the fixed field-type translation table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableColumnDefinition {
    /// The name of the column.
    pub name: String,
    /// The declared type of the column.
    pub typ: String,
}

impl TableColumnDefinition {
    pub fn new(name: String, typ: String) -> TableColumnDefinition {
        Self { name, typ }
    }
}

/// The complete definition of a table: its qualified name and its columns in
/// declaration order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TableDefinition {
    /// The fully qualified name of the table.
    pub name: TableName,
    /// The column definitions, in the order they were first declared.
    pub columns: Vec<TableColumnDefinition>,
}

impl TableDefinition {
    pub fn new(name: TableName, columns: Vec<TableColumnDefinition>) -> TableDefinition {
        Self { name, columns }
    }

    /// Returns the deterministic composite key for this table definition.
    pub fn key(&self) -> String {
        self.name.key()
    }

    /// Derives a [`TableDefinition`] from a change record by zipping its
    /// column-name and column-type sequences positionally.
    pub fn from_record(record: &ChangeRecord) -> TableDefinition {
        let columns = record
            .column_names
            .iter()
            .zip(record.column_types.iter())
            .map(|(name, typ)| TableColumnDefinition::new(name.clone(), typ.clone()))
            .collect();

        Self {
            name: record.table_name(),
            columns,
        }
    }
}

/// A single table-scoped row of values, keyed by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// The fully qualified name of the owning table.
    pub table: TableName,
    values: HashMap<String, Value>,
}

impl TableRow {
    pub fn new(table: TableName, values: HashMap<String, Value>) -> TableRow {
        Self { table, values }
    }

    /// Projects a change record into a [`TableRow`] by zipping its column-name
    /// and column-value sequences positionally.
    pub fn from_record(record: &ChangeRecord) -> TableRow {
        let values = record
            .column_names
            .iter()
            .zip(record.column_values.iter())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Self {
            table: record.table_name(),
            values,
        }
    }

    /// Returns the number of column values held by this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the row holds no column values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Capability of yielding a value for a named column.
///
/// The materializer's `fill` accepts anything implementing this, so decoded
/// [`TableRow`]s and sink-projected metric rows go through one interface
/// instead of a runtime branch on two concrete shapes.
pub trait ColumnValues {
    /// Returns the value bound to `column`, if the row carries one.
    fn value_for(&self, column: &str) -> Option<&Value>;
}

impl ColumnValues for TableRow {
    fn value_for(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

impl ColumnValues for HashMap<String, Value> {
    fn value_for(&self, column: &str) -> Option<&Value> {
        self.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::ChangeKind;

    fn create_test_record() -> ChangeRecord {
        ChangeRecord {
            kind: ChangeKind::Insert,
            schema: "public".to_string(),
            table: "orders".to_string(),
            column_names: vec!["id".to_string(), "amount".to_string()],
            column_types: vec!["int".to_string(), "real".to_string()],
            column_values: vec![Value::Integer(1), Value::Real(9.5)],
        }
    }

    #[test]
    fn table_name_key_is_schema_dot_table() {
        let name = TableName::new("public".to_string(), "orders".to_string());

        assert_eq!(name.key(), "public.orders");
        assert_eq!(name.to_string(), "public.orders");
    }

    #[test]
    fn definition_from_record_zips_names_and_types_in_order() {
        let table = TableDefinition::from_record(&create_test_record());

        assert_eq!(table.key(), "public.orders");
        assert_eq!(
            table.columns,
            vec![
                TableColumnDefinition::new("id".to_string(), "int".to_string()),
                TableColumnDefinition::new("amount".to_string(), "real".to_string()),
            ]
        );
    }

    #[test]
    fn row_from_record_zips_names_and_values() {
        let row = TableRow::from_record(&create_test_record());

        assert_eq!(row.table.key(), "public.orders");
        assert_eq!(row.value_for("id"), Some(&Value::Integer(1)));
        assert_eq!(row.value_for("amount"), Some(&Value::Real(9.5)));
        assert_eq!(row.value_for("missing"), None);
    }
}
