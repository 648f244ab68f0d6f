//! SQLite database client implementation.
//!
//! The file-backed sample database is always opened read-only; no write path
//! to it exists from the chat surface.

use crate::db::{Column, ColumnInfo, DatabaseClient, QueryResult, Row, Schema, Table, Value};
use crate::error::{ParleyError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// Query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// Maximum rows to return from a query.
const MAX_ROWS: usize = 200;

/// SQLite database client.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Opens the database file read-only.
    ///
    /// The file must already exist; `parley seed` creates it. Engine errors
    /// are surfaced verbatim as `ConnectionFailed` and never retried.
    pub async fn connect(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ParleyError::MissingDatabaseFile(path.to_path_buf()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| ParleyError::connection_failed(e.to_string()))?;

        debug!(path = %path.display(), "Opened SQLite database read-only");
        Ok(Self { pool })
    }

    /// Creates a client from an existing connection pool.
    ///
    /// This is primarily useful for testing.
    #[allow(dead_code)]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetches column definitions for a single table via `PRAGMA table_info`.
    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<Column>> {
        // Table names come from sqlite_master, not user input, but quote them
        // anyway since PRAGMA does not support bind parameters.
        let pragma = format!("PRAGMA table_info(\"{}\")", table_name.replace('"', "\"\""));

        let rows = sqlx::query(&pragma)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                ParleyError::schema_unavailable(format!(
                    "Failed to fetch columns for {table_name}: {e}"
                ))
            })?;

        rows.iter()
            .map(|row| {
                let name: String = row.try_get("name").map_err(|e| {
                    ParleyError::schema_unavailable(format!("Bad table_info row: {e}"))
                })?;
                let data_type: String = row.try_get("type").map_err(|e| {
                    ParleyError::schema_unavailable(format!("Bad table_info row: {e}"))
                })?;
                Ok(Column::new(name, data_type))
            })
            .collect()
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        // Base tables only; views and SQLite's internal tables are excluded.
        let table_names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ParleyError::schema_unavailable(format!("Failed to list tables: {e}")))?;

        let mut tables = Vec::with_capacity(table_names.len());
        for table_name in table_names {
            let columns = self.fetch_columns(&table_name).await?;
            tables.push(Table::new(table_name, columns));
        }

        Ok(Schema { tables })
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            sqlx::query(sql).fetch_all(&self.pool),
        )
        .await
        .map_err(|_| {
            ParleyError::query(format!("Query timed out after {QUERY_TIMEOUT_SECS} seconds"))
        })?
        .map_err(|e| ParleyError::query(e.to_string()))?;

        let execution_time = start.elapsed();

        let columns: Vec<ColumnInfo> = result
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|col| {
                        use sqlx::TypeInfo;
                        ColumnInfo::new(col.name(), col.type_info().name())
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Row> = result.iter().take(MAX_ROWS).map(convert_row).collect();

        debug!(
            duration_ms = execution_time.as_millis() as u64,
            row_count = rows.len(),
            "Executed SQLite query"
        );

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx SQLite row into our backend-neutral row type.
///
/// SQLite is dynamically typed, so each cell is probed in affinity order:
/// integer, real, text, blob.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|idx| convert_value(row, idx))
        .collect()
}

fn convert_value(row: &SqliteRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(Value::Float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return v.map(Value::Bytes).unwrap_or(Value::Null);
    }
    Value::Null
}
