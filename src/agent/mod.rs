//! The reasoning agent seam.
//!
//! The chat layer talks to a narrow capability interface: give the agent a
//! question, a live database handle and a progress sink, get back the final
//! answer text. The shipped implementation is `LlmSqlAgent`; tests substitute
//! their own.

pub mod extract;
pub mod prompt;
pub mod sql_agent;

pub use extract::{extract_sql_fragment, SQL_MARKER};
pub use sql_agent::LlmSqlAgent;

use crate::db::DatabaseClient;
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Progress events emitted while the agent works on one question.
///
/// Forwarded to the caller's sink as they happen; never buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A coarse phase change (schema inspection, query execution, ...).
    Status(String),
    /// A streamed response token from the model.
    Token(String),
}

/// The live sink progress events are forwarded to.
///
/// One subscriber per call; the channel never outlives the call. Send errors
/// are ignored — a caller that dropped the receiver simply stops listening.
pub type ProgressSink = mpsc::UnboundedSender<AgentEvent>;

/// Emits an event, ignoring a dropped receiver.
pub(crate) fn emit(sink: &ProgressSink, event: AgentEvent) {
    let _ = sink.send(event);
}

/// A reasoning agent that turns a natural-language question into an answer
/// using a live database handle.
///
/// Implementations own the whole question-to-SQL-to-answer pipeline; callers
/// do not retry, validate, or repair on their behalf.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    /// Answers a single question against the given database handle.
    ///
    /// The returned text may carry a `SQL Query: <sql>` marker line; the chat
    /// layer extracts the fragment from it for display.
    async fn ask(
        &self,
        question: &str,
        db: &dyn DatabaseClient,
        sink: &ProgressSink,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        // Must not panic.
        emit(&tx, AgentEvent::Status("working".to_string()));
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        emit(&tx, AgentEvent::Status("first".to_string()));
        emit(&tx, AgentEvent::Token("second".to_string()));
        drop(tx);

        assert_eq!(rx.recv().await, Some(AgentEvent::Status("first".to_string())));
        assert_eq!(rx.recv().await, Some(AgentEvent::Token("second".to_string())));
        assert_eq!(rx.recv().await, None);
    }
}
