//! Parley - chat with your database in plain English.
//!
//! A demo chat application that routes natural-language questions about a
//! student/course dataset through an LLM agent. The agent inspects the schema,
//! generates a single SELECT statement, executes it against a read-only
//! handle, and narrates the result back as prose.

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod seed;
pub mod session;
