//! Session configuration: what assistant to provision and how to poll runs.
//!
//! Every knob has a code default and an optional environment override, read
//! once by the `from_env` constructors:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ASSISTANTS_POLL_INTERVAL_MS` | 1000 |
//! | `ASSISTANTS_MAX_POLL_ATTEMPTS` | 300 |
//! | `ASSISTANTS_POLL_DEADLINE_SECS` | unset (no deadline) |
//! | `ASSISTANTS_MODEL` | `gpt-4o` |

use crate::types::ToolSpec;
use crate::{Error, ErrorContext, Result};
use std::time::Duration;

pub const DEFAULT_ASSISTANT_NAME: &str = "Math Tutor";
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a personal math tutor. Write and run code to answer math questions.";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Parameters of the `POST /assistants` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolSpec>,
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ASSISTANT_NAME.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            tools: vec![ToolSpec::code_interpreter()],
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl AssistantConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(model) = std::env::var("ASSISTANTS_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
        {
            cfg.model = model;
        }
        cfg
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Run polling cadence and bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay between status checks.
    pub interval: Duration,
    /// Maximum number of status checks before the run is reported as timed out.
    pub max_attempts: u32,
    /// Optional wall-clock bound on the whole poll loop.
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_attempts: 300,
            deadline: None,
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(ms) = env_parse::<u64>("ASSISTANTS_POLL_INTERVAL_MS") {
            cfg.interval = Duration::from_millis(ms);
        }
        if let Some(n) = env_parse::<u32>("ASSISTANTS_MAX_POLL_ATTEMPTS") {
            cfg.max_attempts = n.max(1);
        }
        cfg.deadline = env_parse::<u64>("ASSISTANTS_POLL_DEADLINE_SECS")
            .filter(|s| *s > 0)
            .map(Duration::from_secs);
        cfg
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::configuration_with_context(
                "max_attempts must be at least 1",
                ErrorContext::new()
                    .with_field_path("poll.max_attempts")
                    .with_source("poll_config"),
            ));
        }
        Ok(())
    }
}

/// Everything a session needs besides the credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub assistant: AssistantConfig,
    pub poll: PollConfig,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            assistant: AssistantConfig::from_env(),
            poll: PollConfig::from_env(),
        }
    }

    pub fn with_assistant(mut self, assistant: AssistantConfig) -> Self {
        self.assistant = assistant;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}
