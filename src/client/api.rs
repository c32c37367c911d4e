use crate::client::builder::AssistantsClientBuilder;
use crate::config::AssistantConfig;
use crate::types::{AssistantResource, Credential, MessageList, Run, ThreadMessage, ThreadResource};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// The remote operations a chat session needs.
#[async_trait]
pub trait AssistantsApi: Send + Sync {
    /// `POST /beta/assistants`
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<AssistantResource>;

    /// `POST /beta/threads`
    async fn create_thread(&self) -> Result<ThreadResource>;

    /// `POST /beta/threads/{thread_id}/messages` with role `user`.
    async fn add_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage>;

    /// `POST /beta/threads/{thread_id}/runs`
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// `GET /beta/threads/{thread_id}/runs/{run_id}`
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// `POST /beta/threads/{thread_id}/runs/{run_id}/cancel`
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// `GET /beta/threads/{thread_id}/messages`, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<MessageList>;
}

/// Builds an API handle once the user has supplied a credential.
pub trait Connector: Send + Sync {
    fn connect(&self, credential: &Credential) -> Result<Arc<dyn AssistantsApi>>;
}

/// Connector producing HTTP clients from a builder template.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    template: AssistantsClientBuilder,
}

impl HttpConnector {
    pub fn new(template: AssistantsClientBuilder) -> Self {
        Self { template }
    }
}

impl Connector for HttpConnector {
    fn connect(&self, credential: &Credential) -> Result<Arc<dyn AssistantsApi>> {
        let client = self
            .template
            .clone()
            .credential(credential.clone())
            .build()?;
        Ok(Arc::new(client))
    }
}
