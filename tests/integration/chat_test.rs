//! End-to-end chat tests: real SQLite database, mocked LLM.

use db_parley::agent::{AgentEvent, LlmSqlAgent, ProgressSink};
use db_parley::chat::ChatService;
use db_parley::db::DatabaseClient;
use db_parley::llm::MockLlmClient;
use db_parley::session::TurnRole;
use tokio::sync::mpsc;

use super::seeded_client;

fn service() -> ChatService {
    ChatService::new(Box::new(LlmSqlAgent::new(Box::new(MockLlmClient::new()), true)))
}

fn sink() -> (ProgressSink, mpsc::UnboundedReceiver<AgentEvent>) {
    mpsc::unbounded_channel()
}

#[tokio::test]
async fn test_science_question_end_to_end() {
    let (_dir, client) = seeded_client().await;
    let mut chat = service();
    let (tx, mut rx) = sink();

    let turn = chat
        .ask(
            "How many students are enrolled in Science courses?",
            &client,
            &tx,
        )
        .await
        .unwrap();

    assert_eq!(turn.role, TurnRole::Assistant);
    let sql = turn.sql_fragment.clone().expect("answer carries SQL");
    assert!(sql.contains("department = 'Science'"));

    // One user and one assistant turn, nothing else.
    assert_eq!(chat.log().len(), 2);
    assert_eq!(chat.log().history()[0].text, "How many students are enrolled in Science courses?");

    drop(tx);
    let mut statuses = Vec::new();
    while let Some(event) = rx.recv().await {
        if let AgentEvent::Status(s) = event {
            statuses.push(s);
        }
    }
    assert_eq!(statuses.len(), 4);
    assert!(statuses[2].starts_with("Executing: "));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_generated_sql_runs_against_seeded_data() {
    let (_dir, client) = seeded_client().await;
    let mut chat = service();
    let (tx, _rx) = sink();

    let turn = chat
        .ask("How many students are enrolled in Science courses?", &client, &tx)
        .await
        .unwrap();
    let sql = turn.sql_fragment.clone().unwrap();

    // Students 1 and 3 are enrolled in Biology/Chemistry.
    let result = client.execute_query(&sql).await.unwrap();
    assert_eq!(result.rows[0][0], db_parley::db::Value::Int(2));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_bad_generated_sql_becomes_error_turn() {
    let (_dir, client) = seeded_client().await;
    let mock = MockLlmClient::new()
        .with_response("teachers", "SQL Query: SELECT * FROM teachers");
    let mut chat = ChatService::new(Box::new(LlmSqlAgent::new(Box::new(mock), true)));
    let (tx, _rx) = sink();

    let err = chat
        .ask("Show all teachers", &client, &tx)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        db_parley::error::ParleyError::AgentInvocationFailed(_)
    ));

    // The failure is still recorded as an assistant turn.
    assert_eq!(chat.log().len(), 2);
    assert!(chat.log().last().unwrap().text.starts_with("Error processing question:"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_multi_turn_session_and_export() {
    let (_dir, client) = seeded_client().await;
    let mut chat = service();

    for question in ["How many students are there?", "Show all students"] {
        let (tx, _rx) = sink();
        chat.ask(question, &client, &tx).await.unwrap();
    }
    assert_eq!(chat.log().len(), 4);

    let export = chat.export_as_text();
    assert!(export.starts_with("user: How many students are there?\nassistant: "));
    // Turns keep insertion order.
    let first = export.find("user: How many students are there?").unwrap();
    let second = export.find("user: Show all students").unwrap();
    assert!(first < second);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_prose_answer_has_no_fragment() {
    let (_dir, client) = seeded_client().await;
    let mut chat = service();
    let (tx, _rx) = sink();

    let turn = chat
        .ask("What is the meaning of life?", &client, &tx)
        .await
        .unwrap();
    assert!(turn.sql_fragment.is_none());

    client.close().await.unwrap();
}
