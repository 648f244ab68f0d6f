//! Mock database clients for testing.

use super::{Column, ColumnInfo, DatabaseClient, QueryResult, Schema, Table, Value};
use crate::error::{ParleyError, Result};
use async_trait::async_trait;

/// A mock database client that returns predefined results.
pub struct MockDatabaseClient {
    schema: Schema,
    result: QueryResult,
}

impl MockDatabaseClient {
    /// Creates a new mock client with the sample student schema and a single
    /// canned count result.
    pub fn new() -> Self {
        Self {
            schema: sample_student_schema(),
            result: QueryResult::with_data(
                vec![ColumnInfo::new("count", "INTEGER")],
                vec![vec![Value::Int(3)]],
            ),
        }
    }

    /// Creates a mock client with the given schema and an empty result set.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            result: QueryResult::default(),
        }
    }

    /// Sets the result returned by every query.
    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.result = result;
        self
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Ok(self.schema.clone())
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Ok(self.result.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A mock database client whose every operation fails.
///
/// Used to test error propagation through the agent and chat layers.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a failing client with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        Err(ParleyError::schema_unavailable(self.message.clone()))
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(ParleyError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// The schema of the seeded sample database, for offline tests.
pub fn sample_student_schema() -> Schema {
    Schema {
        tables: vec![
            Table::new(
                "courses",
                vec![
                    Column::new("course_id", "INTEGER"),
                    Column::new("course_name", "TEXT"),
                    Column::new("department", "TEXT"),
                    Column::new("credits", "INTEGER"),
                    Column::new("professor", "TEXT"),
                ],
            ),
            Table::new(
                "enrollments",
                vec![
                    Column::new("enrollment_id", "INTEGER"),
                    Column::new("student_id", "INTEGER"),
                    Column::new("course_id", "INTEGER"),
                    Column::new("semester", "TEXT"),
                    Column::new("grade", "REAL"),
                ],
            ),
            Table::new(
                "students",
                vec![
                    Column::new("student_id", "INTEGER"),
                    Column::new("first_name", "TEXT"),
                    Column::new("last_name", "TEXT"),
                    Column::new("age", "INTEGER"),
                    Column::new("grade_level", "INTEGER"),
                    Column::new("enrollment_date", "DATE"),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_sample_schema() {
        let client = MockDatabaseClient::new();
        let schema = client.introspect_schema().await.unwrap();

        assert_eq!(schema.tables.len(), 3);
        assert!(schema.tables.iter().any(|t| t.name == "students"));
    }

    #[tokio::test]
    async fn test_mock_query_returns_canned_rows() {
        let client = MockDatabaseClient::new();
        let result = client.execute_query("SELECT COUNT(*) FROM students").await.unwrap();

        assert_eq!(result.row_count(), 1);
        assert_eq!(result.rows[0][0], Value::Int(3));
    }

    #[tokio::test]
    async fn test_failing_client_schema_error() {
        let client = FailingDatabaseClient::new("connection reset");
        let err = client.introspect_schema().await.unwrap_err();

        assert!(matches!(err, ParleyError::SchemaUnavailable(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_failing_client_query_error() {
        let client = FailingDatabaseClient::new("permission denied");
        let err = client.execute_query("SELECT 1").await.unwrap_err();

        assert!(matches!(err, ParleyError::Query(_)));
    }
}
