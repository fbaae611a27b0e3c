//! Turn behaviour over the real gateway client, against a local mock gateway

use colony_core::{OrchestratorConfig, TurnOrchestrator, TurnRequest, PROVISIONED_CONFIRMATION};
use colony_llm::{GatewayClient, GatewayConfig, BLANK_RESPONSE_PLACEHOLDER};
use colony_store::{Database, User, NEW_CHAT_TITLE};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RUN_PATH: &str = "/acct/hub/workers-ai/run/@cf/meta/llama-3.1-8b-instruct";

async fn orchestrator(server: &MockServer, db: Database) -> TurnOrchestrator {
    let config = GatewayConfig::new("acct", "hub", "gateway-token")
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(2));
    let client = GatewayClient::new(config).unwrap();
    TurnOrchestrator::new(db, Arc::new(client), OrchestratorConfig::default())
}

async fn mount_answer(server: &MockServer, max_tokens: u32, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .and(body_partial_json(json!({"max_tokens": max_tokens})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn directive_in_nested_result_provisions_agent() {
    let server = MockServer::start().await;
    mount_answer(
        &server,
        2048,
        json!({"success": true, "result": {"response": "Sure! [CREATE_ANT]{\"name\":\"SEO Bot\",\"category\":\"Marketing\"}"}}),
    )
    .await;
    mount_answer(&server, 100, json!({"response": "\"SEO Planning\""})).await;

    let db = Database::in_memory().await.unwrap();
    let orch = orchestrator(&server, db).await;
    let user = User::new("alice", "marketing");

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "okay create them"))
        .await
        .unwrap();

    assert!(response.provisioned);
    assert_eq!(response.answer, format!("Sure! {PROVISIONED_CONFIRMATION}"));
    assert_eq!(response.thread.thread.title, "SEO Planning");

    let agents = orch.catalog().list_visible(&user).await.unwrap();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].category, "Marketing");
    assert_eq!(agents[0].instruction, "Strategic assistant.");
}

#[tokio::test]
async fn gateway_status_failure_is_persisted_as_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_PATH))
        .and(header("cf-aig-authorization", "Bearer gateway-token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let db = Database::in_memory().await.unwrap();
    let orch = orchestrator(&server, db).await;
    let user = User::new("alice", "r");

    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "hello"))
        .await
        .unwrap();

    assert_eq!(response.answer, "AI Error: 500");
    assert!(!response.provisioned);
    // The title call fails too; the default title stays for the next attempt
    assert_eq!(response.thread.thread.title, NEW_CHAT_TITLE);
    let stored = orch.conversations().messages("t1").await.unwrap();
    assert_eq!(stored[1].content, "AI Error: 500");
}

#[tokio::test]
async fn unrecognized_shape_yields_placeholder() {
    let server = MockServer::start().await;
    mount_answer(&server, 2048, json!({"unexpected": true})).await;
    mount_answer(&server, 100, json!({"response": "Chat"})).await;

    let db = Database::in_memory().await.unwrap();
    let orch = orchestrator(&server, db).await;

    let response = orch
        .run_turn(&User::new("alice", "r"), TurnRequest::new("t1", "hello"))
        .await
        .unwrap();
    assert_eq!(response.answer, BLANK_RESPONSE_PLACEHOLDER);
}

#[tokio::test]
async fn conversation_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("colony.db");

    let server = MockServer::start().await;
    mount_answer(&server, 2048, json!({"response": "first"})).await;
    mount_answer(&server, 100, json!({"response": "Kickoff"})).await;

    let user = User::new("alice", "r");
    {
        let orch = orchestrator(&server, Database::from_path(&db_path).await.unwrap()).await;
        orch.run_turn(&user, TurnRequest::new("t1", "hello"))
            .await
            .unwrap();
    }

    let orch = orchestrator(&server, Database::from_path(&db_path).await.unwrap()).await;
    let response = orch
        .run_turn(&user, TurnRequest::new("t1", "again"))
        .await
        .unwrap();

    assert_eq!(response.thread.thread.title, "Kickoff");
    assert_eq!(response.thread.messages.len(), 4);

    let requests = server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests.last().unwrap().body).unwrap();
    let messages = last["messages"].as_array().unwrap();
    // system, two history entries, current prompt
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[3]["content"], "again");
}
