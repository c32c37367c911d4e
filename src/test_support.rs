//! In-memory `AssistantsApi` with scripted run statuses, for unit tests.

use crate::client::{AssistantsApi, Connector};
use crate::config::AssistantConfig;
use crate::types::{
    AssistantResource, ContentBlock, Credential, MessageList, MessageRole, Run, RunLastError,
    RunStatus, ThreadMessage, ThreadResource,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct ScriptedApi {
    statuses: Mutex<VecDeque<RunStatus>>,
    last_status: Mutex<Option<RunStatus>>,
    /// Newest first, like the service.
    history: Mutex<Vec<ThreadMessage>>,
    last_error: Option<String>,
    auto_reply: Option<String>,
    fail_assistant: bool,
    fail_thread: bool,
    fail_add_message: bool,
    stall_status_checks: bool,
    calls: Mutex<Vec<String>>,
    next_id: Mutex<u32>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses returned by successive `retrieve_run` calls; the last one repeats.
    pub fn with_statuses(self, statuses: Vec<RunStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn with_history(self, history: Vec<ThreadMessage>) -> Self {
        *self.history.lock().unwrap() = history;
        self
    }

    pub fn with_last_error(mut self, message: impl Into<String>) -> Self {
        self.last_error = Some(message.into());
        self
    }

    /// Append an assistant reply to the history whenever a run is polled as completed.
    pub fn with_auto_reply(mut self, text: impl Into<String>) -> Self {
        self.auto_reply = Some(text.into());
        self
    }

    pub fn failing_assistant(mut self) -> Self {
        self.fail_assistant = true;
        self
    }

    pub fn failing_thread(mut self) -> Self {
        self.fail_thread = true;
        self
    }

    /// `retrieve_run` never answers.
    pub fn with_stalled_status_checks(mut self) -> Self {
        self.stall_status_checks = true;
        self
    }

    pub fn failing_add_message(mut self) -> Self {
        self.fail_add_message = true;
        self
    }

    pub fn message(id: &str, role: MessageRole, text: &str) -> ThreadMessage {
        ThreadMessage {
            id: id.to_string(),
            role,
            content: vec![ContentBlock::text(text)],
        }
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == call)
            .count()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut n = self.next_id.lock().unwrap();
        *n += 1;
        format!("{}_{}", prefix, n)
    }

    fn remote_failure(what: &str) -> Error {
        Error::Remote {
            status: 500,
            message: format!("{} unavailable", what),
        }
    }
}

#[async_trait]
impl AssistantsApi for ScriptedApi {
    async fn create_assistant(&self, config: &AssistantConfig) -> Result<AssistantResource> {
        self.record("create_assistant");
        if self.fail_assistant {
            return Err(Self::remote_failure("assistants"));
        }
        Ok(AssistantResource {
            id: self.next_id("asst"),
            name: Some(config.name.clone()),
            model: Some(config.model.clone()),
        })
    }

    async fn create_thread(&self) -> Result<ThreadResource> {
        self.record("create_thread");
        if self.fail_thread {
            return Err(Self::remote_failure("threads"));
        }
        Ok(ThreadResource {
            id: self.next_id("thread"),
        })
    }

    async fn add_message(&self, _thread_id: &str, content: &str) -> Result<ThreadMessage> {
        self.record("add_message");
        if self.fail_add_message {
            return Err(Self::remote_failure("messages"));
        }
        let msg = Self::message(&self.next_id("msg"), MessageRole::User, content);
        self.history.lock().unwrap().insert(0, msg.clone());
        Ok(msg)
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<Run> {
        self.record("create_run");
        Ok(Run {
            id: self.next_id("run"),
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn retrieve_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        self.record("retrieve_run");
        if self.stall_status_checks {
            std::future::pending::<()>().await;
        }
        let next = self.statuses.lock().unwrap().pop_front();
        let status = {
            let mut last = self.last_status.lock().unwrap();
            if let Some(s) = next {
                *last = Some(s);
            }
            last.clone().unwrap_or(RunStatus::Queued)
        };
        if let (true, Some(text)) = (status.is_success(), &self.auto_reply) {
            let reply = Self::message(&self.next_id("msg"), MessageRole::Assistant, text);
            self.history.lock().unwrap().insert(0, reply);
        }
        let last_error = if status.is_failure() {
            self.last_error.clone().map(|m| RunLastError {
                code: Some("server_error".into()),
                message: Some(m),
            })
        } else {
            None
        };
        Ok(Run {
            id: run_id.to_string(),
            status,
            last_error,
        })
    }

    async fn cancel_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        self.record("cancel_run");
        Ok(Run {
            id: run_id.to_string(),
            status: RunStatus::Cancelling,
            last_error: None,
        })
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<MessageList> {
        self.record("list_messages");
        Ok(MessageList {
            data: self.history.lock().unwrap().clone(),
            ..MessageList::default()
        })
    }
}

/// Connector handing out one shared `ScriptedApi`.
pub(crate) struct ScriptedConnector {
    pub api: Arc<ScriptedApi>,
}

impl Connector for ScriptedConnector {
    fn connect(&self, _credential: &Credential) -> Result<Arc<dyn AssistantsApi>> {
        Ok(self.api.clone())
    }
}
