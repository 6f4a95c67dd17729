use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnection};
use tracing::{info, warn};

use crate::error::{ErrorKind, WalmetricsResult};
use crate::store::sanitize::check_entity_name;
use crate::types::{ColumnValues, TableDefinition, Value};
use crate::walmetrics_error;

/// Returns whether a table with the definition's name already exists in the
/// store, by querying the SQLite catalog.
pub async fn table_exists(
    conn: &mut SqliteConnection,
    table: &TableDefinition,
) -> WalmetricsResult<bool> {
    let matches = sqlx::query("select name from sqlite_master where type = 'table' and name = ?1")
        .bind(&table.name.name)
        .fetch_all(&mut *conn)
        .await?;

    Ok(!matches.is_empty())
}

/// Builds the CREATE statement for a table definition.
///
/// Sanitizes the table name and every column name before interpolation.
/// Declared column types are carried verbatim inside double quotes; they are
/// not identifiers and may legitimately contain spaces and parentheses
/// (e.g. `character varying(255)`).
fn create_table_ddl(table: &TableDefinition) -> WalmetricsResult<String> {
    check_entity_name(&table.name.name)?;
    for column in &table.columns {
        check_entity_name(&column.name)?;
    }

    let columns = table
        .columns
        .iter()
        .map(|column| format!("\"{}\" \"{}\"", column.name, column.typ))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("create table \"{}\" ({columns})", table.name.name))
}

/// Creates the table described by `table` unless it already exists.
///
/// Recreation attempts log a warning and return without touching the existing
/// table; it is never altered or dropped.
pub async fn create_table(
    conn: &mut SqliteConnection,
    table: &TableDefinition,
) -> WalmetricsResult<()> {
    if table_exists(conn, table).await? {
        warn!(table = %table.name, "table already exists, skipping creation");
        return Ok(());
    }

    let ddl = create_table_ddl(table)?;

    info!(table = %table.name, "creating table");
    sqlx::query(&ddl).execute(&mut *conn).await?;

    Ok(())
}

/// Inserts `rows` into the table described by `table`, one parameterized
/// INSERT per row, naming all declared columns and binding values by column
/// name.
///
/// A row that lacks a value for a declared column fails the whole fill with
/// [`ErrorKind::MissingColumnValue`], carrying the table key, the column name
/// and the row index. Rows before the failing one stay inserted; the caller
/// treats the run as failed either way.
pub async fn fill_table<R>(
    conn: &mut SqliteConnection,
    table: &TableDefinition,
    rows: &[R],
) -> WalmetricsResult<()>
where
    R: ColumnValues,
{
    check_entity_name(&table.name.name)?;
    for column in &table.columns {
        check_entity_name(&column.name)?;
    }

    let columns = table
        .columns
        .iter()
        .map(|column| format!("\"{}\"", column.name))
        .collect::<Vec<_>>()
        .join(", ");
    let parameters = (1..=table.columns.len())
        .map(|position| format!("?{position}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "insert into \"{}\" ({columns}) values ({parameters})",
        table.name.name
    );

    info!(table = %table.name, rows = rows.len(), "filling table");

    for (index, row) in rows.iter().enumerate() {
        let mut query = sqlx::query(&sql);

        for column in &table.columns {
            let value = row.value_for(&column.name).ok_or_else(|| {
                walmetrics_error!(
                    ErrorKind::MissingColumnValue,
                    "row is missing a value for a declared column",
                    format!(
                        "table {}, column {}, row {index}",
                        table.key(),
                        column.name
                    )
                )
            })?;

            query = bind_value(query, value);
        }

        query.execute(&mut *conn).await?;
    }

    Ok(())
}

/// Binds one cell value to the next statement parameter.
fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(value) => query.bind(*value),
        Value::Integer(value) => query.bind(*value),
        Value::Real(value) => query.bind(*value),
        Value::Text(value) => query.bind(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect_ephemeral;
    use crate::types::{TableColumnDefinition, TableName, TableRow};
    use sqlx::Row;
    use std::collections::HashMap;

    fn orders_table() -> TableDefinition {
        TableDefinition::new(
            TableName::new("public".to_string(), "orders".to_string()),
            vec![
                TableColumnDefinition::new("id".to_string(), "int".to_string()),
                TableColumnDefinition::new("amount".to_string(), "real".to_string()),
            ],
        )
    }

    fn order_row(id: i64, amount: f64) -> TableRow {
        let values = HashMap::from([
            ("id".to_string(), Value::Integer(id)),
            ("amount".to_string(), Value::Real(amount)),
        ]);

        TableRow::new(TableName::new("public".to_string(), "orders".to_string()), values)
    }

    async fn count_rows(conn: &mut SqliteConnection, table: &str) -> i64 {
        let sql = format!("select count(*) from \"{table}\"");
        sqlx::query(&sql)
            .fetch_one(&mut *conn)
            .await
            .unwrap()
            .get(0)
    }

    #[tokio::test]
    async fn exists_reflects_catalog_state() {
        let mut conn = connect_ephemeral().await.unwrap();
        let table = orders_table();

        assert!(!table_exists(&mut conn, &table).await.unwrap());

        create_table(&mut conn, &table).await.unwrap();

        assert!(table_exists(&mut conn, &table).await.unwrap());
    }

    #[tokio::test]
    async fn create_is_idempotent() {
        let mut conn = connect_ephemeral().await.unwrap();
        let table = orders_table();

        create_table(&mut conn, &table).await.unwrap();
        create_table(&mut conn, &table).await.unwrap();

        let tables =
            sqlx::query("select name from sqlite_master where type = 'table' and name = 'orders'")
                .fetch_all(&mut conn)
                .await
                .unwrap();
        assert_eq!(tables.len(), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_column_name() {
        let mut conn = connect_ephemeral().await.unwrap();
        let table = TableDefinition::new(
            TableName::new("public".to_string(), "orders".to_string()),
            vec![TableColumnDefinition::new(
                "id\"".to_string(),
                "int".to_string(),
            )],
        );

        let err = create_table(&mut conn, &table).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidEntityName);
        assert!(!table_exists(&mut conn, &orders_table()).await.unwrap());
    }

    #[tokio::test]
    async fn fill_inserts_every_row_with_values_bound_by_column() {
        let mut conn = connect_ephemeral().await.unwrap();
        let table = orders_table();
        let rows = vec![order_row(1, 9.5), order_row(2, 3.0)];

        create_table(&mut conn, &table).await.unwrap();
        fill_table(&mut conn, &table, &rows).await.unwrap();

        assert_eq!(count_rows(&mut conn, "orders").await, 2);

        let row = sqlx::query("select amount from \"orders\" where id = ?1")
            .bind(1i64)
            .fetch_one(&mut conn)
            .await
            .unwrap();
        let amount: f64 = row.get("amount");
        assert_eq!(amount, 9.5);
    }

    #[tokio::test]
    async fn fill_fails_when_a_row_misses_a_declared_column() {
        let mut conn = connect_ephemeral().await.unwrap();
        let table = orders_table();
        let incomplete = TableRow::new(
            TableName::new("public".to_string(), "orders".to_string()),
            HashMap::from([("id".to_string(), Value::Integer(3))]),
        );

        create_table(&mut conn, &table).await.unwrap();
        let err = fill_table(&mut conn, &table, &[incomplete])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingColumnValue);
        let detail = err.detail().unwrap();
        assert!(detail.contains("public.orders"));
        assert!(detail.contains("amount"));
        assert!(detail.contains("row 0"));
    }

    #[tokio::test]
    async fn fill_binds_nulls_and_booleans() {
        let mut conn = connect_ephemeral().await.unwrap();
        let table = TableDefinition::new(
            TableName::new("public".to_string(), "flags".to_string()),
            vec![
                TableColumnDefinition::new("active".to_string(), "boolean".to_string()),
                TableColumnDefinition::new("note".to_string(), "text".to_string()),
            ],
        );
        let row: HashMap<String, Value> = HashMap::from([
            ("active".to_string(), Value::Bool(true)),
            ("note".to_string(), Value::Null),
        ]);

        create_table(&mut conn, &table).await.unwrap();
        fill_table(&mut conn, &table, &[row]).await.unwrap();

        let stored = sqlx::query("select active, note from \"flags\"")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        let active: bool = stored.get("active");
        let note: Option<String> = stored.get("note");
        assert!(active);
        assert_eq!(note, None);
    }
}
