//! Schema introspection integration tests against a real seeded database.

use db_parley::db::DatabaseClient;

use super::seeded_client;

#[tokio::test]
async fn test_schema_llm_rendering() {
    let (_dir, client) = seeded_client().await;
    let schema = client.introspect_schema().await.unwrap();

    let text = schema.format_for_llm();
    assert!(text.starts_with("Database Schema:"));
    assert!(text.contains("Table: students"));
    assert!(text.contains("  - enrollment_date: DATE"));
    assert!(text.contains("Table: enrollments"));
    assert!(text.contains("  - grade: REAL"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_schema_display_rendering() {
    let (_dir, client) = seeded_client().await;
    let schema = client.introspect_schema().await.unwrap();

    let text = schema.format_for_display();
    assert!(text.contains("courses"));
    assert!(text.contains("  - professor (TEXT)"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_schema_hash_is_stable_across_introspections() {
    let (_dir, client) = seeded_client().await;

    let first = client.introspect_schema().await.unwrap();
    let second = client.introspect_schema().await.unwrap();
    assert_eq!(first.content_hash(), second.content_hash());

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_query_result_columns_and_types() {
    let (_dir, client) = seeded_client().await;

    let result = client
        .execute_query("SELECT first_name, age FROM students ORDER BY student_id LIMIT 1")
        .await
        .unwrap();

    assert_eq!(result.columns.len(), 2);
    assert_eq!(result.columns[0].name, "first_name");
    assert_eq!(
        result.rows[0],
        vec![
            db_parley::db::Value::String("John".to_string()),
            db_parley::db::Value::Int(18)
        ]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_bad_sql_is_a_query_error() {
    let (_dir, client) = seeded_client().await;

    let err = client
        .execute_query("SELECT nope FROM not_a_table")
        .await
        .unwrap_err();
    assert!(matches!(err, db_parley::error::ParleyError::Query(_)));

    client.close().await.unwrap();
}
