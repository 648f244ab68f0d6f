//! LLM-backed SQL reasoning agent.
//!
//! The shipped `ReasoningAgent` implementation. One question runs a fixed
//! pipeline: introspect the schema, stream a completion that yields a
//! `SQL Query:` marker line, execute that statement read-only against the
//! handle, then ask the model to narrate the rows. There is no
//! self-correction loop; a failure at any step fails the whole call.

use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::agent::prompt::{build_generation_messages, build_narration_messages, PromptCache};
use crate::agent::{emit, extract_sql_fragment, AgentEvent, ProgressSink, ReasoningAgent, SQL_MARKER};
use crate::db::DatabaseClient;
use crate::error::Result;
use crate::llm::{LlmClient, Message};

/// LLM-backed reasoning agent.
pub struct LlmSqlAgent {
    client: Box<dyn LlmClient>,
    streaming: bool,
    prompt_cache: Mutex<PromptCache>,
}

impl LlmSqlAgent {
    /// Creates a new agent over the given LLM client.
    pub fn new(client: Box<dyn LlmClient>, streaming: bool) -> Self {
        Self {
            client,
            streaming,
            prompt_cache: Mutex::new(PromptCache::new()),
        }
    }

    /// Runs one completion, streaming tokens to the sink when enabled.
    ///
    /// If the streaming request itself cannot be established, falls back to a
    /// non-streaming completion (mid-stream errors still fail the call).
    async fn complete(&self, messages: &[Message], sink: &ProgressSink) -> Result<String> {
        if !self.streaming {
            return self.client.complete(messages).await;
        }

        match self.client.complete_stream(messages).await {
            Ok(mut stream) => {
                let mut content = String::new();
                while let Some(chunk) = stream.next().await {
                    let token = chunk?;
                    emit(sink, AgentEvent::Token(token.clone()));
                    content.push_str(&token);
                }
                Ok(content)
            }
            Err(err) => {
                warn!("Streaming unavailable, falling back to non-streaming: {err}");
                self.client.complete(messages).await
            }
        }
    }
}

#[async_trait]
impl ReasoningAgent for LlmSqlAgent {
    async fn ask(
        &self,
        question: &str,
        db: &dyn DatabaseClient,
        sink: &ProgressSink,
    ) -> Result<String> {
        let start = Instant::now();
        debug!(question_len = question.len(), "Agent invocation started");

        emit(sink, AgentEvent::Status("Inspecting database schema".to_string()));
        let schema = db.introspect_schema().await?;

        let messages = {
            let mut cache = self.prompt_cache.lock().expect("prompt cache poisoned");
            build_generation_messages(&mut cache, &schema, question)
        };

        emit(sink, AgentEvent::Status("Generating SQL".to_string()));
        let draft = self.complete(&messages, sink).await?;

        let Some(sql) = extract_sql_fragment(&draft) else {
            // The model answered in prose; nothing to execute.
            info!(
                total_duration_ms = start.elapsed().as_millis() as u64,
                "Agent answered without SQL"
            );
            return Ok(draft.trim().to_string());
        };

        emit(sink, AgentEvent::Status(format!("Executing: {sql}")));
        let result = db.execute_query(&sql).await?;
        debug!(
            sql_len = sql.len(),
            row_count = result.row_count(),
            "Agent executed generated SQL"
        );

        emit(sink, AgentEvent::Status("Summarizing result".to_string()));
        let narration_messages = build_narration_messages(question, &sql, &result);
        let narration = self.client.complete(&narration_messages).await?;

        info!(
            total_duration_ms = start.elapsed().as_millis() as u64,
            sql_len = sql.len(),
            row_count = result.row_count(),
            "Agent invocation complete"
        );

        // The marker line is re-attached so the chat layer can extract the
        // fragment from the final answer text.
        Ok(format!("{}\n\n{SQL_MARKER} {sql}", narration.trim()))
    }
}
