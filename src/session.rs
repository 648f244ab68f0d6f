//! Conversation session log.
//!
//! An ordered, append-only record of user questions and assistant answers for
//! one interactive session. Turns are immutable once appended; the only
//! mutation is an explicit reset, which empties the log in place and leaves
//! database handles and configuration untouched.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// User question.
    User,
    /// Assistant answer (including error answers).
    Assistant,
}

impl TurnRole {
    /// Returns the role as a string for display and export.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// The role of the message sender.
    pub role: TurnRole,
    /// The message text.
    pub text: String,
    /// SQL fragment extracted from an assistant answer, if any.
    pub sql_fragment: Option<String>,
}

impl Turn {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            sql_fragment: None,
        }
    }

    /// Creates an assistant turn with an optional extracted SQL fragment.
    pub fn assistant(text: impl Into<String>, sql_fragment: Option<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            sql_fragment,
        }
    }
}

/// Append-only conversation log in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    turns: Vec<Turn>,
}

impl SessionLog {
    /// Creates a new empty session log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user turn.
    pub fn append_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    /// Appends an assistant turn.
    pub fn append_assistant(&mut self, text: impl Into<String>, sql_fragment: Option<String>) {
        self.turns.push(Turn::assistant(text, sql_fragment));
    }

    /// Returns all turns in insertion order.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the most recent turn, if any.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if the log has no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Empties the log in place.
    ///
    /// Has no effect on database handles or configuration.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// Renders the log as plain text, one `"<role>: <text>"` line per turn in
    /// insertion order. SQL fragments are not included.
    pub fn export_as_text(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_history_preserves_insertion_order() {
        let mut log = SessionLog::new();
        log.append_user("How many students are there?");
        log.append_assistant("There are 5 students.", None);
        log.append_user("Which departments exist?");

        let history = log.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, TurnRole::User);
        assert_eq!(history[1].role, TurnRole::Assistant);
        assert_eq!(history[2].text, "Which departments exist?");
    }

    #[test]
    fn test_export_as_text_format() {
        let mut log = SessionLog::new();
        log.append_user("How many students?");
        log.append_assistant(
            "There are 5 students.",
            Some("SELECT COUNT(*) FROM students".to_string()),
        );

        assert_eq!(
            log.export_as_text(),
            "user: How many students?\nassistant: There are 5 students."
        );
    }

    #[test]
    fn test_export_omits_sql_fragment() {
        let mut log = SessionLog::new();
        log.append_assistant("Answer.", Some("SELECT 1".to_string()));

        assert!(!log.export_as_text().contains("SELECT 1"));
    }

    #[test]
    fn test_export_empty_log() {
        assert_eq!(SessionLog::new().export_as_text(), "");
    }

    #[test]
    fn test_reset_empties_log() {
        let mut log = SessionLog::new();
        for i in 0..10 {
            log.append_user(format!("question {i}"));
        }
        assert_eq!(log.len(), 10);

        log.reset();
        assert!(log.is_empty());
        assert!(log.history().is_empty());
    }

    #[test]
    fn test_append_after_reset() {
        let mut log = SessionLog::new();
        log.append_user("first");
        log.reset();
        log.append_user("second");

        assert_eq!(log.len(), 1);
        assert_eq!(log.history()[0].text, "second");
    }

    #[test]
    fn test_last_turn() {
        let mut log = SessionLog::new();
        assert!(log.last().is_none());

        log.append_user("question");
        log.append_assistant("answer", None);
        assert_eq!(log.last().unwrap().role, TurnRole::Assistant);
    }

    #[test]
    fn test_assistant_turn_keeps_fragment() {
        let turn = Turn::assistant("text", Some("SELECT * FROM students".to_string()));
        assert_eq!(
            turn.sql_fragment.as_deref(),
            Some("SELECT * FROM students")
        );
    }
}
