//! # assistants-chat
//!
//! Session runtime for chatting with a hosted assistant over the Assistants
//! REST API: supply a key, provision an assistant and its thread, then
//! exchange messages while a poller follows each run to its terminal status.
//!
//! ## Overview
//!
//! - **Transport**: one HTTP client bound to a base URL and bearer credential
//! - **Provisioning**: create the assistant, then its thread, in that order
//! - **Exchange**: optimistic local append, remote append, then a run
//! - **Polling**: fixed cadence, bounded by attempts and an optional deadline,
//!   cancellable per run
//! - **Session**: explicit state with a pure `(state, event) -> state` transition
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use assistants_chat::{SessionConfig, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> assistants_chat::Result<()> {
//!     let mut session = SessionController::new(SessionConfig::from_env());
//!     session.set_api_key("sk-...");
//!     session.create_assistant().await?;
//!
//!     session.send_message("Solve 3x + 11 = 14").await?;
//!     for msg in &session.state().messages {
//!         println!("{}: {}", msg.role.as_str(), msg.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | HTTP transport and its error type |
//! | [`client`] | `AssistantsApi` trait, HTTP client and builder |
//! | [`poller`] | Run polling, outcomes and cancellation |
//! | [`session`] | Session state, events and controller |
//! | [`config`] | Assistant and polling configuration |
//! | [`types`] | Wire and display types |

pub mod client;
pub mod config;
pub mod poller;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use client::{AssistantsApi, AssistantsClient, AssistantsClientBuilder, Connector, HttpConnector};
pub use config::{AssistantConfig, PollConfig, SessionConfig};
pub use poller::{CancelHandle, RunOutcome, RunPoller};
pub use session::{Session, SessionController, SessionEvent, Step};
pub use types::{Credential, Message, MessageRole, RunStatus};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
