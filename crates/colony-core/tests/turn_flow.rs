//! End-to-end turn behaviour against an in-memory database and a scripted generator

use colony_core::{Error, OrchestratorConfig, TurnOrchestrator, TurnRequest};
use colony_llm::{GenerationError, MockGenerator};
use colony_store::{ChatRole, Database, User, NEW_CHAT_TITLE};
use std::sync::Arc;

const CONFIRMATION: &str = "*(Provisioned: Ant created successfully!)*";

async fn setup() -> (TurnOrchestrator, MockGenerator) {
    let mock = MockGenerator::new();
    let db = Database::in_memory().await.unwrap();
    let orch = TurnOrchestrator::new(db, Arc::new(mock.clone()), OrchestratorConfig::default());
    (orch, mock)
}

#[tokio::test]
async fn history_passed_to_generator_excludes_current_prompt() {
    let (orch, mock) = setup().await;
    let user = User::new("alice", "marketing");
    mock.push_reply("a1");
    mock.push_reply("Short Title");

    for n in 1..=3 {
        orch.run_turn(&user, TurnRequest::new("t1", format!("q{n}")))
            .await
            .unwrap();
    }

    let turns: Vec<_> = mock
        .requests()
        .into_iter()
        .filter(|r| r.max_tokens != 100)
        .collect();
    assert_eq!(turns.len(), 3);
    for (i, turn) in turns.iter().enumerate() {
        // N-th user message: N-1 prior user messages, each with its reply
        assert_eq!(turn.history().len(), 2 * i);
        let prompt = format!("q{}", i + 1);
        assert_eq!(turn.prompt().unwrap().content, prompt);
        assert!(turn.history().iter().all(|m| m.content != prompt));
    }
}

#[tokio::test]
async fn foreign_thread_is_rejected_and_nothing_is_written() {
    let (orch, mock) = setup().await;
    let alice = User::new("alice", "r");
    let bob = User::new("bob", "r");

    orch.run_turn(&alice, TurnRequest::new("t1", "hello")).await.unwrap();
    let calls_before = mock.requests().len();

    let err = orch
        .run_turn(&bob, TurnRequest::new("t1", "let me in"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
    assert_eq!(mock.requests().len(), calls_before);

    let thread = orch.conversations().get_thread("t1", "alice").await.unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert!(thread.messages.iter().all(|m| m.content != "let me in"));
}

#[tokio::test]
async fn single_directive_creates_private_agent_and_cleans_answer() {
    let (orch, mock) = setup().await;
    let user = User::new("alice", "marketing");
    mock.push_reply(r#"Sure! [CREATE_ANT]{"name":"SEO Bot","description":"x"}"#);

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "okay create them"))
        .await
        .unwrap();

    assert!(response.provisioned);
    assert_eq!(response.answer, format!("Sure! {CONFIRMATION}"));
    assert_eq!(response.provisioned_agents.len(), 1);

    let agent = &response.provisioned_agents[0];
    assert_eq!(agent.name, "SEO Bot");
    assert_eq!(agent.owner_id.as_deref(), Some("alice"));
    assert!(!agent.is_public);

    // The stored assistant message is the cleaned answer
    let last = response.thread.messages.last().unwrap();
    assert_eq!(last.role, ChatRole::Assistant);
    assert_eq!(last.content, response.answer);

    // The next turn lists the new agent in the catalog context
    orch.run_turn(&user, TurnRequest::new("t1", "thanks")).await.unwrap();
    let last_turn = mock
        .requests()
        .into_iter()
        .filter(|r| r.max_tokens != 100)
        .last()
        .unwrap();
    assert!(last_turn.system().unwrap().content.contains(r#""name":"SEO Bot""#));
}

#[tokio::test]
async fn multiple_directives_create_all_but_clean_only_first() {
    let (orch, mock) = setup().await;
    let user = User::new("alice", "r");
    let raw = "Done: [CREATE_ANT]{\"name\":\"One\"} and [CREATE_ANT]{\"name\":\"Two\"}";
    mock.push_reply(raw);

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "create both"))
        .await
        .unwrap();

    assert_eq!(response.provisioned_agents.len(), 2);
    assert_eq!(
        response.answer,
        format!("Done: {CONFIRMATION} and [CREATE_ANT]{{\"name\":\"Two\"}}")
    );
    let names: Vec<String> = orch
        .catalog()
        .list_visible(&user)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["One".to_string(), "Two".to_string()]);
}

#[tokio::test]
async fn generation_failure_is_answered_in_band() {
    let (orch, mock) = setup().await;
    let user = User::new("alice", "r");
    mock.push_result(Err(GenerationError::Status(500)));

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "hello"))
        .await
        .unwrap();

    assert_eq!(response.answer, "AI Error: 500");
    assert!(!response.provisioned);
    let last = response.thread.messages.last().unwrap();
    assert_eq!(last.content, "AI Error: 500");
}

#[tokio::test]
async fn empty_title_keeps_default() {
    let (orch, mock) = setup().await;
    let user = User::new("alice", "r");
    mock.push_reply("answer");
    mock.push_reply("  \"\"  ");

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "hello"))
        .await
        .unwrap();
    assert_eq!(response.thread.thread.title, NEW_CHAT_TITLE);

    // Still the default, so the next turn retitles
    mock.push_reply("answer 2");
    mock.push_reply("Greeting Chat");
    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "hello again"))
        .await
        .unwrap();
    assert_eq!(response.thread.thread.title, "Greeting Chat");
}

#[tokio::test]
async fn malformed_directive_creates_nothing_and_keeps_text() {
    let (orch, mock) = setup().await;
    let user = User::new("alice", "r");
    mock.push_reply("[CREATE_ANT]{not json");

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "go"))
        .await
        .unwrap();

    assert!(!response.provisioned);
    assert_eq!(response.answer, "[CREATE_ANT]{not json");
    assert!(orch.catalog().list_visible(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn response_carries_thread_with_ordered_messages() {
    let (orch, mock) = setup().await;
    let user = User::new("alice", "r");
    mock.push_reply("hi there");
    mock.push_reply("Greeting");

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "hello"))
        .await
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["answer"], "hi there");
    assert_eq!(json["provisioned"], false);
    assert_eq!(json["thread"]["id"], "t1");
    assert_eq!(json["thread"]["title"], "Greeting");
    assert_eq!(json["thread"]["messages"][0]["role"], "user");
    assert_eq!(json["thread"]["messages"][1]["content"], "hi there");
    assert!(json.get("provisioned_agents").is_none());
}

#[tokio::test]
async fn directives_beyond_form_limits_are_still_provisioned() {
    let (orch, mock) = setup().await;
    let user = User::new("u1", "r");

    mock.push_reply(format!(
        r#"Sure! [CREATE_ANT]{{"name":"Long Bot","description":"{}"}}"#,
        "d".repeat(600)
    ));
    mock.push_reply("Bots");
    let long = orch
        .run_turn(&user, TurnRequest::new("t1", "make a long one"))
        .await
        .unwrap();
    assert!(long.provisioned);
    assert_eq!(long.answer, format!("Sure! {CONFIRMATION}"));

    mock.push_reply(r#"Sure! [CREATE_ANT]{"name":"Blank Bot","system_instruction":"","category":""}"#);
    let blank = orch
        .run_turn(&user, TurnRequest::new("t1", "make a blank one"))
        .await
        .unwrap();
    assert!(blank.provisioned);
    assert_eq!(blank.provisioned_agents[0].name, "Blank Bot");

    let names: Vec<_> = orch
        .catalog()
        .list_visible(&user)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["Long Bot", "Blank Bot"]);
}
