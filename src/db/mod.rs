//! Database abstraction layer for Parley.
//!
//! Provides a trait-based interface for database operations, allowing the
//! SQLite and MySQL backends to be used interchangeably.

mod manager;
mod mock;
mod mysql;
mod schema;
mod sqlite;
mod types;

pub use manager::ConnectionManager;
pub use mock::{sample_student_schema, FailingDatabaseClient, MockDatabaseClient};
pub use mysql::MysqlClient;
pub use schema::{Column, Schema, Table};
pub use sqlite::SqliteClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Sqlite,
    Mysql,
}

impl DatabaseBackend {
    /// Returns the backend as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "mysql" => Some(Self::Mysql),
            _ => None,
        }
    }

    /// Returns the default port for this backend, if it is networked.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::Sqlite => None,
            Self::Mysql => Some(3306),
        }
    }
}

impl std::fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Creates a database client for the given configuration.
///
/// This is the central factory function for database connections. The config
/// is validated before any connection attempt; SQLite handles are opened
/// read-only.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    config.validate()?;

    match config {
        ConnectionConfig::Sqlite { path } => {
            let client = SqliteClient::connect(path).await?;
            Ok(Box::new(client))
        }
        ConnectionConfig::Mysql(mysql) => {
            let client = MysqlClient::connect(mysql).await?;
            Ok(Box::new(client))
        }
    }
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with ParleyError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Introspects the database schema, returning base tables with their
    /// column name/type pairs. Read-only; never mutates the database.
    async fn introspect_schema(&self) -> Result<Schema>;

    /// Executes a SQL query and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
