//! Prompt construction for the SQL agent.
//!
//! Builds the generation prompt (schema context, marker-line output format)
//! and the narration prompt (summarize rows into an answer).

use crate::db::{QueryResult, Schema};
use crate::llm::Message;
use std::sync::Arc;

/// System prompt for the SQL generation phase.
const GENERATION_PROMPT_TEMPLATE: &str = r#"You are a SQL assistant for a relational database containing student records. Generate SQL queries based on user questions.

DATABASE SCHEMA:
{schema}

INSTRUCTIONS:
- Generate a single read-only SELECT statement that answers the question
- Respond with exactly one line of the form:
SQL Query: <the full SQL statement on one line>
- No markdown, no code fences, no explanations
- Never generate INSERT, UPDATE, DELETE, or DDL statements
- If the question cannot be answered with the schema, explain why in plain prose instead of emitting the marker line"#;

/// System prompt for the narration phase.
const NARRATION_SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question in one or two plain sentences using only the query result provided. Do not include SQL in your answer.";

/// Builds the generation system prompt with the database schema injected.
pub fn build_system_prompt(schema: &Schema) -> String {
    GENERATION_PROMPT_TEMPLATE.replace("{schema}", &schema.format_for_llm())
}

/// Builds the message list for the SQL generation phase.
pub fn build_generation_messages(
    cache: &mut PromptCache,
    schema: &Schema,
    question: &str,
) -> Vec<Message> {
    vec![
        Message::system(cache.get_or_build(schema).to_string()),
        Message::user(question),
    ]
}

/// Builds the message list for the narration phase.
///
/// The user message carries the question, the executed SQL, and the result
/// rows rendered as compact text. The literal `Query result:` label doubles
/// as the phase marker the mock client keys on.
pub fn build_narration_messages(question: &str, sql: &str, result: &QueryResult) -> Vec<Message> {
    let content = format!(
        "Question: {question}\nExecuted SQL: {sql}\nQuery result:\n{}",
        result.format_for_llm()
    );

    vec![Message::system(NARRATION_SYSTEM_PROMPT), Message::user(content)]
}

/// Cache for the formatted generation prompt.
///
/// Avoids rebuilding the schema text on every question when the schema has
/// not changed.
#[derive(Debug, Default)]
pub struct PromptCache {
    schema_hash: u64,
    system_prompt: Option<Arc<str>>,
}

impl PromptCache {
    /// Creates a new empty prompt cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cached system prompt, rebuilding if the schema has changed.
    pub fn get_or_build(&mut self, schema: &Schema) -> Arc<str> {
        let hash = schema.content_hash();
        if self.schema_hash != hash || self.system_prompt.is_none() {
            self.schema_hash = hash;
            self.system_prompt = Some(Arc::from(build_system_prompt(schema)));
        }
        Arc::clone(self.system_prompt.as_ref().expect("prompt was just built"))
    }

    /// Invalidates the cache, forcing a rebuild on next access.
    pub fn invalidate(&mut self) {
        self.schema_hash = 0;
        self.system_prompt = None;
    }
}
