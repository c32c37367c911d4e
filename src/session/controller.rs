use crate::client::{AssistantsApi, AssistantsClientBuilder, Connector, HttpConnector};
use crate::config::SessionConfig;
use crate::poller::{CancelHandle, RunPoller};
use crate::session::state::{Session, SessionEvent, Step};
use crate::types::{Credential, Message};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns one [`Session`] and drives it through the remote calls.
///
/// Every operation records failures in the session's error slot and also
/// returns them. Operations take `&mut self`, so one controller never runs two
/// call chains at once.
pub struct SessionController {
    config: SessionConfig,
    connector: Arc<dyn Connector>,
    api: Option<Arc<dyn AssistantsApi>>,
    poller: RunPoller,
    cancel: CancelHandle,
    state: Session,
}

impl SessionController {
    /// Controller talking HTTP to the default endpoint.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_connector(
            config,
            Arc::new(HttpConnector::new(AssistantsClientBuilder::new())),
        )
    }

    pub fn with_connector(config: SessionConfig, connector: Arc<dyn Connector>) -> Self {
        let poller = RunPoller::new(config.poll.clone());
        Self {
            config,
            connector,
            api: None,
            poller,
            cancel: CancelHandle::new(),
            state: Session::new(),
        }
    }

    pub fn state(&self) -> &Session {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Handle that cancels the run currently being polled.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.dispatch(SessionEvent::ApiKeyChanged(key.into()));
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.dispatch(SessionEvent::InputChanged(text.into()));
    }

    fn dispatch(&mut self, event: SessionEvent) {
        debug!(event = event_name(&event), "session event");
        let current = std::mem::take(&mut self.state);
        self.state = current.apply(event);
    }

    /// Provision the assistant, then its thread. Moves the session to chat on success.
    ///
    /// Fails with a validation error, leaving state untouched, once the session
    /// is already chatting: the assistant and thread are provisioned once.
    pub async fn create_assistant(&mut self) -> Result<()> {
        if self.state.step == Step::Chat {
            return Err(Error::validation_with_context(
                "session already has an assistant and thread",
                ErrorContext::new()
                    .with_field_path("session.step")
                    .with_source("session"),
            ));
        }
        self.dispatch(SessionEvent::SetupStarted);

        let api = match Credential::new(self.state.api_key.clone())
            .and_then(|c| self.connector.connect(&c))
        {
            Ok(api) => api,
            Err(e) => {
                self.dispatch(SessionEvent::SetupFailed(format!(
                    "Error creating assistant: {}",
                    e
                )));
                return Err(e);
            }
        };
        self.api = Some(api.clone());

        match api.create_assistant(&self.config.assistant).await {
            Ok(assistant) => {
                info!(assistant_id = %assistant.id, "assistant provisioned");
                self.dispatch(SessionEvent::AssistantCreated(assistant.id));
            }
            Err(e) => {
                warn!(error = %e, "assistant creation failed");
                self.dispatch(SessionEvent::SetupFailed(format!(
                    "Error creating assistant: {}",
                    e
                )));
                return Err(e);
            }
        }

        self.create_thread(api.as_ref()).await
    }

    async fn create_thread(&mut self, api: &dyn AssistantsApi) -> Result<()> {
        match api.create_thread().await {
            Ok(thread) => {
                info!(thread_id = %thread.id, "thread provisioned");
                self.dispatch(SessionEvent::ThreadCreated(thread.id));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "thread creation failed");
                self.dispatch(SessionEvent::SetupFailed(format!(
                    "Error creating thread: {}",
                    e
                )));
                Err(e)
            }
        }
    }

    /// Send whatever is in the input buffer.
    pub async fn submit_input(&mut self) -> Result<()> {
        let text = self.state.input.clone();
        self.send_message(&text).await
    }

    /// Append a user message, run the assistant and wait for the outcome.
    ///
    /// Empty or whitespace-only text is ignored without touching state or the
    /// network.
    pub async fn send_message(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let (api, assistant_id, thread_id) = self.chat_context()?;

        self.dispatch(SessionEvent::MessageSubmitted(Message::local_user(text)));

        if let Err(e) = api.add_message(&thread_id, text).await {
            warn!(thread_id = %thread_id, error = %e, "message append failed");
            self.dispatch(SessionEvent::SendFailed(format!(
                "Error sending message: {}",
                e
            )));
            return Err(e);
        }
        self.dispatch(SessionEvent::MessagePosted);

        let token = self.cancel.begin_run();
        let result = self
            .poller
            .execute(api.as_ref(), &thread_id, &assistant_id, &token)
            .await
            .and_then(|outcome| outcome.into_result());
        self.cancel.end_run();

        match result {
            Ok(messages) => {
                self.dispatch(SessionEvent::RunCompleted(messages));
                Ok(())
            }
            Err(e) => {
                let shown = if e.is_run_outcome() {
                    e.to_string()
                } else {
                    format!("Error running thread: {}", e)
                };
                warn!(thread_id = %thread_id, error = %e, "run did not complete");
                self.dispatch(SessionEvent::RunFailed(shown));
                Err(e)
            }
        }
    }

    fn chat_context(&self) -> Result<(Arc<dyn AssistantsApi>, String, String)> {
        let not_ready = |field: &str| {
            Error::validation_with_context(
                "session is not provisioned; create an assistant first",
                ErrorContext::new()
                    .with_field_path(format!("session.{}", field))
                    .with_source("session"),
            )
        };
        if self.state.step != Step::Chat {
            return Err(not_ready("step"));
        }
        let api = self.api.clone().ok_or_else(|| not_ready("api"))?;
        let assistant_id = self
            .state
            .assistant_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| not_ready("assistant_id"))?;
        let thread_id = self
            .state
            .thread_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| not_ready("thread_id"))?;
        Ok((api, assistant_id, thread_id))
    }
}

fn event_name(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::ApiKeyChanged(_) => "api_key_changed",
        SessionEvent::InputChanged(_) => "input_changed",
        SessionEvent::SetupStarted => "setup_started",
        SessionEvent::AssistantCreated(_) => "assistant_created",
        SessionEvent::ThreadCreated(_) => "thread_created",
        SessionEvent::SetupFailed(_) => "setup_failed",
        SessionEvent::MessageSubmitted(_) => "message_submitted",
        SessionEvent::MessagePosted => "message_posted",
        SessionEvent::SendFailed(_) => "send_failed",
        SessionEvent::RunCompleted(_) => "run_completed",
        SessionEvent::RunFailed(_) => "run_failed",
    }
}
