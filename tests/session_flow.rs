//! End-to-end session tests: provisioning, exchange and polling over HTTP.

mod common;

use assistants_chat::{
    Error, HttpConnector, MessageRole, PollConfig, SessionConfig, SessionController, Step,
};
use common::mock_server::{text_message, MockServerFixture};
use mockito::Mock;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn controller(fixture: &MockServerFixture) -> SessionController {
    let config = SessionConfig::default()
        .with_poll(PollConfig::new().with_interval(Duration::from_millis(1)));
    let connector = Arc::new(HttpConnector::new(
        assistants_chat::AssistantsClientBuilder::new().base_url(&fixture.base_url),
    ));
    let mut ctl = SessionController::with_connector(config, connector);
    ctl.set_api_key("sk-test");
    ctl
}

/// Callers keep the returned mocks alive for the whole test.
async fn provision(fixture: &mut MockServerFixture) -> Vec<Mock> {
    vec![
        fixture
            .mock_json("POST", "/beta/assistants", 200, json!({"id": "asst_1"}))
            .await,
        fixture
            .mock_json("POST", "/beta/threads", 200, json!({"id": "thread_1"}))
            .await,
    ]
}

#[tokio::test]
async fn test_full_exchange_over_http() {
    let mut fixture = MockServerFixture::new().await;
    let _setup = provision(&mut fixture).await;
    let _append = fixture
        .mock_json(
            "POST",
            "/beta/threads/thread_1/messages",
            200,
            text_message("msg_1", "user", "Solve 3x + 11 = 14"),
        )
        .await;
    let _run = fixture
        .mock_json(
            "POST",
            "/beta/threads/thread_1/runs",
            200,
            json!({"id": "run_1", "status": "queued"}),
        )
        .await;
    let queued = fixture.mock_run_status("thread_1", "run_1", "queued").await;
    let running = fixture.mock_run_status("thread_1", "run_1", "in_progress").await;
    let done = fixture.mock_run_status("thread_1", "run_1", "completed").await;
    let history = fixture
        .mock_json(
            "GET",
            "/beta/threads/thread_1/messages",
            200,
            json!({
                "object": "list",
                "data": [
                    text_message("msg_2", "assistant", "x = 1"),
                    text_message("msg_1", "user", "Solve 3x + 11 = 14")
                ],
                "has_more": false
            }),
        )
        .await;

    let mut ctl = controller(&fixture);
    ctl.create_assistant().await.unwrap();
    assert_eq!(ctl.state().step, Step::Chat);
    assert_eq!(ctl.state().assistant_id.as_deref(), Some("asst_1"));
    assert_eq!(ctl.state().thread_id.as_deref(), Some("thread_1"));

    ctl.set_input("Solve 3x + 11 = 14");
    ctl.submit_input().await.unwrap();

    let s = ctl.state();
    assert_eq!(s.messages.len(), 2);
    assert_eq!(s.messages[0].id, "msg_1");
    assert_eq!(s.messages[1].role, MessageRole::Assistant);
    assert_eq!(s.messages[1].content, "x = 1");
    assert!(s.input.is_empty());
    assert!(s.error.is_none());

    queued.assert_async().await;
    running.assert_async().await;
    done.assert_async().await;
    history.assert_async().await;
}

#[tokio::test]
async fn test_failed_run_over_http_keeps_optimistic_message() {
    let mut fixture = MockServerFixture::new().await;
    let _setup = provision(&mut fixture).await;
    let _append = fixture
        .mock_json(
            "POST",
            "/beta/threads/thread_1/messages",
            200,
            text_message("msg_1", "user", "hi"),
        )
        .await;
    let _run = fixture
        .mock_json(
            "POST",
            "/beta/threads/thread_1/runs",
            200,
            json!({"id": "run_1", "status": "queued"}),
        )
        .await;
    let _status = fixture
        .mock_json(
            "GET",
            "/beta/threads/thread_1/runs/run_1",
            200,
            json!({
                "id": "run_1",
                "status": "failed",
                "last_error": {"code": "rate_limit_exceeded", "message": "You exceeded your current quota"}
            }),
        )
        .await;
    let history = fixture
        .server
        .mock("GET", "/v1/beta/threads/thread_1/messages")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut ctl = controller(&fixture);
    ctl.create_assistant().await.unwrap();
    let err = ctl.send_message("hi").await.unwrap_err();

    assert!(matches!(err, Error::RunFailed { .. }));
    let s = ctl.state();
    assert_eq!(s.messages.len(), 1);
    assert!(s.messages[0].is_local());
    let shown = s.error.as_deref().unwrap();
    assert!(shown.contains("failed"));
    assert!(shown.contains("exceeded your current quota"));
    history.assert_async().await;
}

#[tokio::test]
async fn test_assistant_rejection_stays_in_setup() {
    let mut fixture = MockServerFixture::new().await;
    let _rejected = fixture
        .mock_json(
            "POST",
            "/beta/assistants",
            401,
            json!({"error": {"message": "Incorrect API key provided"}}),
        )
        .await;
    let threads = fixture
        .server
        .mock("POST", "/v1/beta/threads")
        .expect(0)
        .create_async()
        .await;

    let mut ctl = controller(&fixture);
    assert!(ctl.create_assistant().await.is_err());

    let s = ctl.state();
    assert_eq!(s.step, Step::Setup);
    assert_eq!(
        s.error.as_deref(),
        Some("Error creating assistant: Remote error: HTTP 401: Incorrect API key provided")
    );
    threads.assert_async().await;
}
