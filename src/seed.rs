//! Sample database generation.
//!
//! Creates the `student.db` SQLite file with three tables, seed rows, and two
//! convenience views. This is the only code path that writes to the file; the
//! chat surface always opens it read-only.

use crate::error::{ParleyError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

const CREATE_STUDENTS: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    student_id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    age INTEGER,
    grade_level INTEGER,
    enrollment_date DATE
)
"#;

const CREATE_COURSES: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    course_id INTEGER PRIMARY KEY,
    course_name TEXT NOT NULL,
    department TEXT,
    credits INTEGER,
    professor TEXT
)
"#;

const CREATE_ENROLLMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS enrollments (
    enrollment_id INTEGER PRIMARY KEY,
    student_id INTEGER,
    course_id INTEGER,
    semester TEXT,
    grade REAL,
    FOREIGN KEY (student_id) REFERENCES students (student_id),
    FOREIGN KEY (course_id) REFERENCES courses (course_id)
)
"#;

const CREATE_STUDENT_PERFORMANCE_VIEW: &str = r#"
CREATE VIEW IF NOT EXISTS student_performance AS
SELECT
    s.student_id,
    s.first_name || ' ' || s.last_name as student_name,
    c.course_name,
    e.grade,
    e.semester
FROM students s
JOIN enrollments e ON s.student_id = e.student_id
JOIN courses c ON e.course_id = c.course_id
"#;

const CREATE_DEPARTMENT_STATS_VIEW: &str = r#"
CREATE VIEW IF NOT EXISTS department_stats AS
SELECT
    c.department,
    COUNT(DISTINCT e.student_id) as total_students,
    AVG(e.grade) as average_grade
FROM courses c
JOIN enrollments e ON c.course_id = e.course_id
GROUP BY c.department
"#;

const STUDENTS: &[(i64, &str, &str, i64, i64, &str)] = &[
    (1, "John", "Doe", 18, 12, "2023-09-01"),
    (2, "Jane", "Smith", 17, 11, "2023-09-01"),
    (3, "Michael", "Johnson", 16, 10, "2023-09-01"),
    (4, "Emily", "Brown", 18, 12, "2023-09-01"),
    (5, "William", "Davis", 17, 11, "2023-09-01"),
];

const COURSES: &[(i64, &str, &str, i64, &str)] = &[
    (1, "Introduction to Biology", "Science", 4, "Dr. Smith"),
    (2, "World History", "History", 3, "Prof. Johnson"),
    (3, "Algebra II", "Mathematics", 4, "Dr. Brown"),
    (4, "English Literature", "English", 3, "Prof. Davis"),
    (5, "Chemistry", "Science", 4, "Dr. Wilson"),
];

// The last row references course 6, which does not exist; SQLite does not
// enforce foreign keys by default and the views drop the dangling row.
const ENROLLMENTS: &[(i64, i64, i64, &str, f64)] = &[
    (1, 1, 1, "Fall 2023", 3.8),
    (2, 1, 3, "Fall 2023", 3.5),
    (3, 2, 2, "Fall 2023", 4.0),
    (4, 2, 4, "Fall 2023", 3.7),
    (5, 3, 1, "Fall 2023", 3.9),
    (6, 3, 5, "Fall 2023", 3.6),
    (7, 4, 6, "Fall 2023", 3.8),
];

/// Sample queries printed after seeding, for the operator to try.
pub const SAMPLE_QUERIES: &[(&str, &str)] = &[
    ("Show all students", "SELECT * FROM students"),
    (
        "Show course enrollment counts",
        "SELECT course_name, COUNT(*) as enrollment_count FROM courses JOIN enrollments ON courses.course_id = enrollments.course_id GROUP BY course_name",
    ),
    ("Show student performance", "SELECT * FROM student_performance"),
    ("Show department statistics", "SELECT * FROM department_stats"),
];

/// Creates (or refreshes) the sample database at the given path.
///
/// Tables are created if missing and seed rows are written with
/// `INSERT OR REPLACE`, so re-running is safe.
pub async fn create_sample_database(path: &Path) -> Result<()> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        // sqlx enables foreign_keys by default; the seed data relies on
        // SQLite's own default (off) so the dangling enrollment row inserts.
        .foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| ParleyError::connection_failed(e.to_string()))?;

    create_schema(&pool).await?;
    insert_seed_rows(&pool).await?;

    pool.close().await;
    info!(path = %path.display(), "Sample database created");
    Ok(())
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for ddl in [
        CREATE_STUDENTS,
        CREATE_COURSES,
        CREATE_ENROLLMENTS,
        CREATE_STUDENT_PERFORMANCE_VIEW,
        CREATE_DEPARTMENT_STATS_VIEW,
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| ParleyError::query(format!("Failed to create schema: {e}")))?;
    }
    Ok(())
}

async fn insert_seed_rows(pool: &SqlitePool) -> Result<()> {
    for (id, first, last, age, grade_level, date) in STUDENTS {
        sqlx::query("INSERT OR REPLACE INTO students VALUES (?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(first)
            .bind(last)
            .bind(age)
            .bind(grade_level)
            .bind(date)
            .execute(pool)
            .await
            .map_err(|e| ParleyError::query(format!("Failed to seed students: {e}")))?;
    }

    for (id, name, department, credits, professor) in COURSES {
        sqlx::query("INSERT OR REPLACE INTO courses VALUES (?, ?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(department)
            .bind(credits)
            .bind(professor)
            .execute(pool)
            .await
            .map_err(|e| ParleyError::query(format!("Failed to seed courses: {e}")))?;
    }

    for (id, student_id, course_id, semester, grade) in ENROLLMENTS {
        sqlx::query("INSERT OR REPLACE INTO enrollments VALUES (?, ?, ?, ?, ?)")
            .bind(id)
            .bind(student_id)
            .bind(course_id)
            .bind(semester)
            .bind(grade)
            .execute(pool)
            .await
            .map_err(|e| ParleyError::query(format!("Failed to seed enrollments: {e}")))?;
    }

    Ok(())
}
