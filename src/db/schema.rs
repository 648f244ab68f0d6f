//! Database schema types for Parley.
//!
//! Both backends introspect differently (SQLite reads `sqlite_master` and
//! `PRAGMA table_info`, MySQL reads `information_schema`); these types are the
//! single normalized shape they both produce.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Represents the schema of a database: base tables in name order, columns in
/// declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// All base tables in the schema.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats the schema for inclusion in an LLM system prompt.
    pub fn format_for_llm(&self) -> String {
        let tables_text = self
            .tables
            .iter()
            .map(|table| {
                let column_lines = table
                    .columns
                    .iter()
                    .map(|c| format!("  - {}: {}\n", c.name, c.data_type))
                    .collect::<Vec<_>>()
                    .join("");
                format!("Table: {}\n{}\n", table.name, column_lines)
            })
            .collect::<Vec<_>>()
            .join("");

        format!("Database Schema:\n\n{tables_text}")
    }

    /// Formats the schema for terminal display.
    pub fn format_for_display(&self) -> String {
        self.tables
            .iter()
            .map(|table| {
                let column_lines = table
                    .columns
                    .iter()
                    .map(|c| format!("  - {} ({})\n", c.name, c.data_type))
                    .collect::<Vec<_>>()
                    .join("");
                format!("Table: {}\n{}", table.name, column_lines)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Computes a hash of the schema content for prompt-cache invalidation.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tables.len().hash(&mut hasher);
        for table in &self.tables {
            table.name.hash(&mut hasher);
            table.columns.len().hash(&mut hasher);
            for col in &table.columns {
                col.name.hash(&mut hasher);
                col.data_type.hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

/// Represents a database table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in declaration order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a new table with the given name and columns.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Data type as reported by the backend (e.g., "INTEGER", "varchar(50)").
    pub data_type: String,
}

impl Column {
    /// Creates a new column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}
