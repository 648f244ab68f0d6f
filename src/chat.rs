//! The chat bridge between the session log and the reasoning agent.
//!
//! `ChatService` is stateless per call: all state is the database handle
//! (owned by the caller) plus the session log it maintains. Nothing here is
//! retried — a failed call produces one error turn and the user must re-ask.

use crate::agent::{extract_sql_fragment, ProgressSink, ReasoningAgent};
use crate::db::DatabaseClient;
use crate::error::{ParleyError, Result};
use crate::session::{SessionLog, Turn};
use tracing::{debug, warn};

/// Drives one conversational session against a reasoning agent.
pub struct ChatService {
    agent: Box<dyn ReasoningAgent>,
    log: SessionLog,
}

impl ChatService {
    /// Creates a new chat service over the given agent with an empty log.
    pub fn new(agent: Box<dyn ReasoningAgent>) -> Self {
        Self {
            agent,
            log: SessionLog::new(),
        }
    }

    /// Returns the session log.
    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Empties the session log. Handles and configuration are untouched.
    pub fn reset(&mut self) {
        self.log.reset();
    }

    /// Exports the session log as plain text.
    pub fn export_as_text(&self) -> String {
        self.log.export_as_text()
    }

    /// Asks one question.
    ///
    /// Appends the user turn, invokes the agent with the given handle and
    /// progress sink, extracts the SQL fragment from the answer, and appends
    /// the assistant turn. On agent failure the error text is still appended
    /// as an assistant turn — the log stays a complete record of what was
    /// asked and what happened — and `AgentInvocationFailed` is returned.
    pub async fn ask(
        &mut self,
        question: &str,
        db: &dyn DatabaseClient,
        sink: &ProgressSink,
    ) -> Result<&Turn> {
        self.log.append_user(question);

        match self.agent.ask(question, db, sink).await {
            Ok(answer) => {
                let sql_fragment = extract_sql_fragment(&answer);
                debug!(
                    answer_len = answer.len(),
                    has_sql = sql_fragment.is_some(),
                    "Agent answered"
                );
                self.log.append_assistant(answer, sql_fragment);
                Ok(self.log.last().expect("turn was just appended"))
            }
            Err(e) => {
                let message = match e {
                    ParleyError::AgentInvocationFailed(m) => m,
                    other => other.to_string(),
                };
                warn!(error = %message, "Agent invocation failed");
                self.log
                    .append_assistant(format!("Error processing question: {message}"), None);
                Err(ParleyError::agent(message))
            }
        }
    }
}
