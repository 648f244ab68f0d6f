//! Seed generator integration tests.
//!
//! Verifies the shape and content of the sample database and that the chat
//! surface's handle to it is truly read-only.

use db_parley::db::DatabaseClient;

use super::seeded_client;

#[tokio::test]
async fn test_seeded_database_has_three_base_tables() {
    let (_dir, client) = seeded_client().await;

    let schema = client.introspect_schema().await.unwrap();
    let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(names, vec!["courses", "enrollments", "students"]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_seeded_table_columns() {
    let (_dir, client) = seeded_client().await;
    let schema = client.introspect_schema().await.unwrap();

    let columns_of = |table: &str| -> Vec<String> {
        schema
            .tables
            .iter()
            .find(|t| t.name == table)
            .unwrap_or_else(|| panic!("table {table} should exist"))
            .columns
            .iter()
            .map(|c| c.name.clone())
            .collect()
    };

    assert_eq!(
        columns_of("students"),
        vec![
            "student_id",
            "first_name",
            "last_name",
            "age",
            "grade_level",
            "enrollment_date"
        ]
    );
    assert_eq!(
        columns_of("courses"),
        vec!["course_id", "course_name", "department", "credits", "professor"]
    );
    assert_eq!(
        columns_of("enrollments"),
        vec!["enrollment_id", "student_id", "course_id", "semester", "grade"]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_seeded_row_counts() {
    let (_dir, client) = seeded_client().await;

    let students = client
        .execute_query("SELECT COUNT(*) FROM students")
        .await
        .unwrap();
    assert_eq!(students.rows[0][0], db_parley::db::Value::Int(5));

    let enrollments = client
        .execute_query("SELECT COUNT(*) FROM enrollments")
        .await
        .unwrap();
    assert_eq!(enrollments.rows[0][0], db_parley::db::Value::Int(7));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_views_are_queryable_but_not_introspected() {
    let (_dir, client) = seeded_client().await;

    // Views never appear in the schema handed to the agent...
    let schema = client.introspect_schema().await.unwrap();
    assert!(schema.tables.iter().all(|t| t.name != "student_performance"));
    assert!(schema.tables.iter().all(|t| t.name != "department_stats"));

    // ...but generated SQL can still query them.
    let result = client
        .execute_query("SELECT * FROM student_performance ORDER BY student_id")
        .await
        .unwrap();
    // The dangling enrollment (course 6) drops out of the join.
    assert_eq!(result.row_count(), 6);

    let stats = client
        .execute_query("SELECT * FROM department_stats ORDER BY department")
        .await
        .unwrap();
    assert_eq!(stats.row_count(), 4);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_chat_handle_is_read_only() {
    let (_dir, client) = seeded_client().await;

    let result = client
        .execute_query("INSERT INTO students VALUES (99, 'X', 'Y', 20, 12, '2024-01-01')")
        .await;
    assert!(result.is_err());

    // The data is untouched.
    let count = client
        .execute_query("SELECT COUNT(*) FROM students")
        .await
        .unwrap();
    assert_eq!(count.rows[0][0], db_parley::db::Value::Int(5));

    client.close().await.unwrap();
}
