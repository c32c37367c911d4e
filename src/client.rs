//! Assistants API client.
//!
//! The session talks to the service only through [`AssistantsApi`]; the HTTP
//! implementation is [`AssistantsClient`]. A [`Connector`] turns the
//! credential entered by the user into a ready API handle.

pub mod api;
pub mod builder;
pub mod core;

pub use api::{AssistantsApi, Connector, HttpConnector};
pub use builder::{AssistantsClientBuilder, DEFAULT_BASE_URL, DEFAULT_BETA_HEADER};
pub use core::AssistantsClient;
