//! Mock LLM clients for testing.
//!
//! Provide deterministic responses based on input patterns, without making
//! real API calls.

use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;

use crate::error::{ParleyError, Result};
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Marker the narration prompt carries, used to tell the two agent phases
/// apart. Must match the literal in `agent::prompt`.
const NARRATION_MARKER: &str = "Query result:";

/// Mock LLM client that returns canned responses based on input patterns.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the input contains `pattern`, the mock will return `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Generates a mock response based on the input.
    fn mock_response(&self, input: &str) -> String {
        let input_lower = input.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        // Narration phase: summarize whatever rows were passed in.
        if input.contains(NARRATION_MARKER) {
            return "Based on the query result, the answer to your question is shown above."
                .to_string();
        }

        // Generation phase: emit the marker line the agent extracts.
        if input_lower.contains("science") {
            return "SQL Query: SELECT COUNT(DISTINCT e.student_id) FROM enrollments e JOIN courses c ON e.course_id = c.course_id WHERE c.department = 'Science'".to_string();
        }

        if input_lower.contains("all students") {
            return "SQL Query: SELECT * FROM students".to_string();
        }

        if input_lower.contains("how many students") || input_lower.contains("count") {
            return "SQL Query: SELECT COUNT(*) FROM students".to_string();
        }

        "I can only answer questions about students, courses, and enrollments.".to_string()
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let input = Self::extract_user_input(messages);
        Ok(self.mock_response(&input))
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>> {
        let response = self.complete(messages).await?;

        // Simulate streaming by yielding chunks.
        let chunks: Vec<String> = response
            .chars()
            .collect::<Vec<_>>()
            .chunks(10)
            .map(|c| c.iter().collect())
            .collect();

        let stream = stream::iter(chunks.into_iter().map(Ok));
        Ok(stream.boxed())
    }
}

/// A mock LLM client whose every call fails.
#[derive(Debug, Clone)]
pub struct FailingLlmClient {
    message: String,
}

impl FailingLlmClient {
    /// Creates a failing client with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        Err(ParleyError::agent(self.message.clone()))
    }

    async fn complete_stream(
        &self,
        _messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>> {
        Err(ParleyError::agent(self.message.clone()))
    }
}
