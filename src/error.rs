//! Error types for Parley.
//!
//! Defines the main error enum used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Parley operations.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// The SQLite database file does not exist yet.
    #[error("Database file not found at {}. Run `parley seed` first to create the sample database.", .0.display())]
    MissingDatabaseFile(PathBuf),

    /// A required MySQL connection field was left empty.
    #[error("Incomplete MySQL credentials: missing {0}")]
    IncompleteCredentials(String),

    /// The underlying engine refused the connection (host unreachable, auth failed, etc.)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema introspection queries failed (handle closed, permission denied, etc.)
    #[error("Schema unavailable: {0}")]
    SchemaUnavailable(String),

    /// The reasoning agent failed (bad SQL it could not recover from, execution
    /// error, timeout from the underlying client).
    #[error("Agent invocation failed: {0}")]
    AgentInvocationFailed(String),

    /// No model API key configured; question dispatch is blocked entirely.
    #[error("No API key configured. Pass --api-key or set GROQ_API_KEY.")]
    MissingCredential,

    /// Query execution errors (syntax errors, unknown columns, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration errors (invalid config file, bad connection URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ParleyError {
    /// Creates an incomplete-credentials error naming the missing fields.
    pub fn incomplete_credentials(fields: &[&str]) -> Self {
        Self::IncompleteCredentials(fields.join(", "))
    }

    /// Creates a connection error with the given message.
    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::ConnectionFailed(msg.into())
    }

    /// Creates a schema-unavailable error wrapping the underlying cause.
    pub fn schema_unavailable(msg: impl Into<String>) -> Self {
        Self::SchemaUnavailable(msg.into())
    }

    /// Creates an agent invocation error with the underlying message.
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::AgentInvocationFailed(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingDatabaseFile(_) => "Missing Database File",
            Self::IncompleteCredentials(_) => "Incomplete Credentials",
            Self::ConnectionFailed(_) => "Connection Error",
            Self::SchemaUnavailable(_) => "Schema Error",
            Self::AgentInvocationFailed(_) => "Agent Error",
            Self::MissingCredential => "Missing Credential",
            Self::Query(_) => "Query Error",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using ParleyError.
pub type Result<T> = std::result::Result<T, ParleyError>;
