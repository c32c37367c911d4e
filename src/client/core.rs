use crate::client::api::AssistantsApi;
use crate::config::AssistantConfig;
use crate::transport::HttpTransport;
use crate::types::{
    AssistantResource, MessageList, MessageRole, Run, ThreadMessage, ThreadResource, ToolSpec,
};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

/// Largest page the messages endpoint serves.
const MESSAGE_PAGE_LIMIT: u32 = 100;

/// HTTP client for the Assistants API.
#[derive(Debug)]
pub struct AssistantsClient {
    transport: HttpTransport,
}

#[derive(Serialize)]
struct CreateAssistantBody<'a> {
    name: &'a str,
    instructions: &'a str,
    tools: &'a [ToolSpec],
    model: &'a str,
}

#[derive(Serialize)]
struct CreateMessageBody<'a> {
    role: MessageRole,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunBody<'a> {
    assistant_id: &'a str,
}

impl AssistantsClient {
    pub fn builder() -> crate::client::builder::AssistantsClientBuilder {
        crate::client::builder::AssistantsClientBuilder::new()
    }

    pub(crate) fn from_transport(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    fn require_id(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Error::validation_with_context(
                format!("{} must not be empty", field),
                ErrorContext::new()
                    .with_field_path(field)
                    .with_source("assistants_client"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AssistantsApi for AssistantsClient {
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<AssistantResource> {
        let body = CreateAssistantBody {
            name: &config.name,
            instructions: &config.instructions,
            tools: &config.tools,
            model: &config.model,
        };
        let assistant: AssistantResource =
            self.transport.post_json("/beta/assistants", &body).await?;
        info!(assistant_id = %assistant.id, model = %config.model, "assistant created");
        Ok(assistant)
    }

    async fn create_thread(&self) -> Result<ThreadResource> {
        let thread: ThreadResource = self
            .transport
            .post_json("/beta/threads", &serde_json::json!({}))
            .await?;
        info!(thread_id = %thread.id, "thread created");
        Ok(thread)
    }

    async fn add_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage> {
        Self::require_id(thread_id, "thread_id")?;
        let body = CreateMessageBody {
            role: MessageRole::User,
            content,
        };
        let msg: ThreadMessage = self
            .transport
            .post_json(&format!("/beta/threads/{}/messages", thread_id), &body)
            .await?;
        debug!(thread_id, message_id = %msg.id, "message appended");
        Ok(msg)
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        Self::require_id(thread_id, "thread_id")?;
        Self::require_id(assistant_id, "assistant_id")?;
        let run: Run = self
            .transport
            .post_json(
                &format!("/beta/threads/{}/runs", thread_id),
                &CreateRunBody { assistant_id },
            )
            .await?;
        info!(thread_id, run_id = %run.id, status = %run.status, "run created");
        Ok(run)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let run: Run = self
            .transport
            .get_json(&format!("/beta/threads/{}/runs/{}", thread_id, run_id))
            .await?;
        debug!(thread_id, run_id, status = %run.status, "run status");
        Ok(run)
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let run: Run = self
            .transport
            .post_json(
                &format!("/beta/threads/{}/runs/{}/cancel", thread_id, run_id),
                &serde_json::json!({}),
            )
            .await?;
        info!(thread_id, run_id, status = %run.status, "run cancel requested");
        Ok(run)
    }

    /// Fetch the whole thread, newest first, following the `after` cursor
    /// across pages.
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList> {
        Self::require_id(thread_id, "thread_id")?;
        let base = format!(
            "/beta/threads/{}/messages?limit={}&order=desc",
            thread_id, MESSAGE_PAGE_LIMIT
        );

        let mut all = MessageList::default();
        let mut after: Option<String> = None;
        loop {
            let path = match &after {
                Some(cursor) => format!("{}&after={}", base, cursor),
                None => base.clone(),
            };
            let page: MessageList = self.transport.get_json(&path).await?;
            debug!(thread_id, count = page.data.len(), has_more = page.has_more, "message page");

            let next = page.next_cursor().map(String::from);
            if all.first_id.is_none() {
                all.first_id = page.first_id.clone();
            }
            all.last_id = page.last_id.clone().or(all.last_id.take());
            all.data.extend(page.data);

            match next {
                Some(cursor) if after.as_deref() != Some(cursor.as_str()) => after = Some(cursor),
                _ => break,
            }
        }

        debug!(thread_id, count = all.data.len(), "messages listed");
        Ok(all)
    }
}
