//! SQL fragment extraction from answer text.
//!
//! A best-effort heuristic: the agent is prompted to emit a literal
//! `SQL Query:` marker before the statement, and we take whatever follows the
//! first occurrence of that marker up to the end of the line. If the marker
//! happens to appear earlier in unrelated prose, the wrong line is extracted;
//! that imprecision is accepted rather than attempting full parsing.

/// The literal marker preceding the SQL statement in an answer.
pub const SQL_MARKER: &str = "SQL Query:";

/// Extracts the SQL fragment from an assistant answer, if present.
///
/// Returns the text after the first `SQL Query:` marker up to the first
/// newline, trimmed of surrounding whitespace. An absent marker, or a marker
/// followed by nothing but whitespace, yields `None`.
pub fn extract_sql_fragment(answer: &str) -> Option<String> {
    let idx = answer.find(SQL_MARKER)?;
    let rest = &answer[idx + SQL_MARKER.len()..];
    let fragment = rest.lines().next().unwrap_or("").trim();

    if fragment.is_empty() {
        None
    } else {
        Some(fragment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_fragment_up_to_newline() {
        let answer = "SQL Query: SELECT * FROM students\nMore text";
        assert_eq!(
            extract_sql_fragment(answer),
            Some("SELECT * FROM students".to_string())
        );
    }

    #[test]
    fn test_no_marker_yields_none() {
        assert_eq!(extract_sql_fragment("There are 5 students."), None);
    }

    #[test]
    fn test_fragment_is_trimmed() {
        let answer = "SQL Query:   SELECT COUNT(*) FROM courses   \nrest";
        assert_eq!(
            extract_sql_fragment(answer),
            Some("SELECT COUNT(*) FROM courses".to_string())
        );
    }

    #[test]
    fn test_marker_at_end_of_text() {
        let answer = "The answer is 3.\n\nSQL Query: SELECT COUNT(*) FROM students";
        assert_eq!(
            extract_sql_fragment(answer),
            Some("SELECT COUNT(*) FROM students".to_string())
        );
    }

    #[test]
    fn test_empty_fragment_yields_none() {
        assert_eq!(extract_sql_fragment("SQL Query:   \ntext"), None);
        assert_eq!(extract_sql_fragment("SQL Query:"), None);
    }

    #[test]
    fn test_first_marker_wins() {
        // Documented imprecision: an earlier occurrence in prose is taken.
        let answer = "I ran SQL Query: one\nSQL Query: two";
        assert_eq!(extract_sql_fragment(answer), Some("one".to_string()));
    }
}
