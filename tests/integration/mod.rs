//! Integration tests for Parley.

pub mod chat_test;
pub mod schema_test;
pub mod seed_test;

use db_parley::db::SqliteClient;
use db_parley::seed::create_sample_database;
use tempfile::TempDir;

/// Seeds a sample database in a fresh temp directory and opens it read-only.
///
/// The TempDir must be kept alive for as long as the client is used.
pub async fn seeded_client() -> (TempDir, SqliteClient) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("student.db");
    create_sample_database(&path).await.expect("seed database");

    let client = SqliteClient::connect(&path).await.expect("open database");
    (dir, client)
}
