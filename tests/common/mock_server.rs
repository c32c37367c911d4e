//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use assistants_chat::{AssistantsClient, AssistantsClientBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::Value;

pub const TEST_KEY: &str = "sk-test";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v1", server.url());
        Self { server, base_url }
    }

    pub fn builder(&self) -> AssistantsClientBuilder {
        AssistantsClientBuilder::new()
            .api_key(TEST_KEY)
            .base_url(&self.base_url)
    }

    /// Create a test client with the mock server as base URL
    pub fn client(&self) -> AssistantsClient {
        self.builder().build().expect("client should build")
    }

    /// JSON endpoint that also checks the auth and content-type headers.
    /// Any query string is accepted.
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: Value) -> Mock {
        self.server
            .mock(method, format!("/v1{}", path).as_str())
            .match_query(Matcher::Any)
            .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
            .match_header("content-type", "application/json")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Like [`mock_json`](Self::mock_json) but also requires an exact JSON request body.
    pub async fn mock_json_body(
        &mut self,
        method: &str,
        path: &str,
        request: Value,
        response: Value,
    ) -> Mock {
        self.server
            .mock(method, format!("/v1{}", path).as_str())
            .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
            .match_body(Matcher::Json(request))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response.to_string())
            .create_async()
            .await
    }

    /// Run status endpoint answering `status` exactly once.
    pub async fn mock_run_status(&mut self, thread: &str, run: &str, status: &str) -> Mock {
        self.server
            .mock("GET", format!("/v1/beta/threads/{}/runs/{}", thread, run).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({"id": run, "object": "thread.run", "status": status}).to_string())
            .expect(1)
            .create_async()
            .await
    }

    /// One page of a thread's message list, matched on its exact query string.
    pub async fn mock_message_page(&mut self, thread: &str, query: &str, page: Value) -> Mock {
        self.server
            .mock("GET", format!("/v1/beta/threads/{}/messages", thread).as_str())
            .match_query(Matcher::Exact(query.to_string()))
            .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page.to_string())
            .expect(1)
            .create_async()
            .await
    }
}

pub fn text_message(id: &str, role: &str, text: &str) -> Value {
    serde_json::json!({
        "id": id,
        "object": "thread.message",
        "role": role,
        "content": [{"type": "text", "text": {"value": text, "annotations": []}}]
    })
}
