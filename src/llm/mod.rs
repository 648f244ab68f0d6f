//! LLM integration for Parley.
//!
//! Provides the client trait the reasoning agent speaks through, plus the
//! Groq implementation and a mock for tests.

pub mod groq;
pub mod mock;
pub mod types;

pub use groq::{GroqClient, GroqConfig};
pub use mock::{FailingLlmClient, MockLlmClient};
pub use types::{Message, Role};

use crate::config::ModelConfig;
use crate::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Trait for LLM clients that can generate completions.
///
/// Implementations must be thread-safe (Send + Sync) to support async
/// operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given messages.
    ///
    /// Returns the complete response as a single string.
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Generates a streaming completion for the given messages.
    ///
    /// Returns a stream of response chunks as they arrive.
    async fn complete_stream(
        &self,
        messages: &[Message],
    ) -> Result<BoxStream<'static, Result<String>>>;
}

/// Creates the Groq client for the given model configuration.
///
/// Fails with `MissingCredential` before any request is built when no API key
/// is available.
pub fn create_client(model: &ModelConfig) -> Result<Box<dyn LlmClient>> {
    let api_key = model.resolve_api_key()?;
    let config = GroqConfig::new(api_key, model.model.clone()).with_temperature(model.temperature);
    Ok(Box::new(GroqClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParleyError;

    #[test]
    fn test_create_client_with_key() {
        let model = ModelConfig {
            api_key: Some("gsk-test".to_string()),
            ..ModelConfig::default()
        };
        assert!(create_client(&model).is_ok());
    }

    #[test]
    fn test_create_client_without_key_fails() {
        // Only deterministic when the env var is absent.
        if std::env::var("GROQ_API_KEY").is_ok() {
            return;
        }
        let result = create_client(&ModelConfig::default());
        assert!(matches!(result, Err(ParleyError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_mock_client_implements_trait() {
        let client: Box<dyn LlmClient> = Box::new(MockLlmClient::new());
        let messages = vec![Message::user("How many students are there?")];
        let response = client.complete(&messages).await.unwrap();
        assert!(response.contains("SQL Query:"));
    }
}
