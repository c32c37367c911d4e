//! Session state and its pure transition function.

use crate::types::Message;
use serde::{Deserialize, Serialize};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Setup,
    Chat,
}

/// Everything a presentation layer needs to render a chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub step: Step,
    /// Raw API key as typed; never serialized.
    #[serde(skip)]
    pub api_key: String,
    pub input: String,
    pub assistant_id: Option<String>,
    pub thread_id: Option<String>,
    pub messages: Vec<Message>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ApiKeyChanged(String),
    InputChanged(String),
    SetupStarted,
    AssistantCreated(String),
    ThreadCreated(String),
    SetupFailed(String),
    /// Optimistic local append of the user's message.
    MessageSubmitted(Message),
    /// The service accepted the message; the input buffer is cleared.
    MessagePosted,
    SendFailed(String),
    /// Server history replaces the displayed list.
    RunCompleted(Vec<Message>),
    RunFailed(String),
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the next state.
    pub fn apply(mut self, event: SessionEvent) -> Session {
        match event {
            SessionEvent::ApiKeyChanged(key) => self.api_key = key,
            SessionEvent::InputChanged(text) => self.input = text,
            SessionEvent::SetupStarted => {
                self.loading = true;
                self.error = None;
            }
            SessionEvent::AssistantCreated(id) => self.assistant_id = Some(id),
            SessionEvent::ThreadCreated(id) => {
                self.thread_id = Some(id);
                if self.assistant_id.is_some() {
                    self.step = Step::Chat;
                }
                self.loading = false;
            }
            SessionEvent::SetupFailed(msg) => {
                self.error = Some(msg);
                self.loading = false;
            }
            SessionEvent::MessageSubmitted(msg) => {
                self.messages.push(msg);
                self.loading = true;
                self.error = None;
            }
            SessionEvent::MessagePosted => self.input.clear(),
            SessionEvent::SendFailed(msg) | SessionEvent::RunFailed(msg) => {
                self.error = Some(msg);
                self.loading = false;
            }
            SessionEvent::RunCompleted(messages) => {
                self.messages = messages;
                self.loading = false;
            }
        }
        self
    }

    /// Both remote resources exist.
    pub fn is_provisioned(&self) -> bool {
        matches!(
            (&self.assistant_id, &self.thread_id),
            (Some(a), Some(t)) if !a.is_empty() && !t.is_empty()
        )
    }

    pub fn can_create_assistant(&self) -> bool {
        self.step == Step::Setup && !self.api_key.trim().is_empty() && !self.loading
    }

    pub fn can_send(&self) -> bool {
        self.step == Step::Chat && !self.input.trim().is_empty() && !self.loading
    }
}

/// `(state, event) -> state`, leaving the input untouched.
pub fn transition(state: &Session, event: SessionEvent) -> Session {
    state.clone().apply(event)
}
