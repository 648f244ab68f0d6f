//! MySQL database client implementation.
//!
//! Normalizes MySQL's `information_schema` introspection into the same
//! `Schema` shape the SQLite backend produces.

use crate::config::MysqlConfig;
use crate::db::{Column, ColumnInfo, DatabaseClient, QueryResult, Row, Schema, Table, Value};
use crate::error::{ParleyError, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow};
use std::time::{Duration, Instant};
use tracing::debug;

/// Query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// Maximum rows to return from a query.
const MAX_ROWS: usize = 200;

/// MySQL database client.
#[derive(Debug)]
pub struct MysqlClient {
    pool: MySqlPool,
}

impl MysqlClient {
    /// Connects to the MySQL server described by the config.
    ///
    /// The config must already be complete (`MysqlConfig::validate`); engine
    /// errors are surfaced verbatim as `ConnectionFailed` and never retried.
    pub async fn connect(config: &MysqlConfig) -> Result<Self> {
        let conn_str = config.to_connection_string()?;

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(&conn_str)
            .await
            .map_err(|e| ParleyError::connection_failed(e.to_string()))?;

        debug!(
            host = %config.host,
            database = %config.database,
            "Connected to MySQL database"
        );
        Ok(Self { pool })
    }

    /// Creates a client from an existing connection pool.
    ///
    /// This is primarily useful for testing.
    #[allow(dead_code)]
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Fetches column definitions for a single table.
    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<Column>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT column_name, column_type
            FROM information_schema.columns
            WHERE table_schema = DATABASE() AND table_name = ?
            ORDER BY ordinal_position
            "#,
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            ParleyError::schema_unavailable(format!(
                "Failed to fetch columns for {table_name}: {e}"
            ))
        })?;

        Ok(rows
            .into_iter()
            .map(|(name, data_type)| Column::new(name, data_type))
            .collect())
    }
}

#[async_trait]
impl DatabaseClient for MysqlClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        let table_names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'
            ORDER BY table_name
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
            "Executed MySQL query"
        );

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx MySQL row into our backend-neutral row type.
fn convert_row(row: &MySqlRow) -> Row {
    (0..row.columns().len())
        .map(|idx| convert_value(row, idx))
        .collect()
}

fn convert_value(row: &MySqlRow, idx: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(idx) {
        return v.map(|n| Value::Int(n as i64)).unwrap_or(Value::Null);
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
