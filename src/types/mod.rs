//! # Types Module
//!
//! Strongly-typed representations of the Assistants API objects this crate
//! touches, plus the display-side [`Message`] the session exposes.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Credential`] | Bearer token, redacted in `Debug` output |
//! | [`AssistantResource`] / [`ThreadResource`] | Provisioned remote identifiers |
//! | [`Message`] | Display message (`id`, `role`, `content`) |
//! | [`ThreadMessage`] | Wire message with its content blocks |
//! | [`RunStatus`] | Run lifecycle status |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`message`] | Display and wire message types |
//! | [`resource`] | Credential, assistant/thread resources, tool specs |
//! | [`run`] | Run objects and status classification |

pub mod message;
pub mod resource;
pub mod run;

pub use message::{ContentBlock, Message, MessageList, MessageRole, ThreadMessage};
pub use resource::{AssistantResource, Credential, ThreadResource, ToolSpec};
pub use run::{Run, RunLastError, RunStatus};
