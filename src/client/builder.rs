use crate::client::core::AssistantsClient;
use crate::config::env_parse;
use crate::transport::HttpTransport;
use crate::types::Credential;
use crate::{Error, ErrorContext, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_BETA_HEADER: &str = "assistants=v2";

/// Builder for creating clients with custom configuration.
///
/// Unset fields fall back to the environment, then to code defaults:
/// - api key: `OPENAI_API_KEY`
/// - base URL: `ASSISTANTS_BASE_URL`, then [`DEFAULT_BASE_URL`]
/// - timeout: `ASSISTANTS_HTTP_TIMEOUT_SECS`, then none
#[derive(Debug, Clone)]
pub struct AssistantsClientBuilder {
    credential: Option<Credential>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    beta_header: Option<String>,
}

impl AssistantsClientBuilder {
    pub fn new() -> Self {
        Self {
            credential: None,
            api_key: None,
            base_url: None,
            timeout: None,
            beta_header: Some(DEFAULT_BETA_HEADER.to_string()),
        }
    }

    /// Set the API key. Validated at [`build`](Self::build).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Override the base URL (primarily for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Value of the `OpenAI-Beta` header; `None` stops sending it.
    pub fn beta_header(mut self, value: Option<String>) -> Self {
        self.beta_header = value;
        self
    }

    pub fn build(self) -> Result<AssistantsClient> {
        let credential = match (self.credential, self.api_key) {
            (Some(c), _) => c,
            (None, Some(key)) => Credential::new(key)?,
            (None, None) => {
                let key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                    Error::configuration_with_context(
                        "API key required",
                        ErrorContext::new()
                            .with_field_path("client.api_key")
                            .with_source("client_builder"),
                    )
                })?;
                Credential::new(key)?
            }
        };

        let base_url = self
            .base_url
            .or_else(|| std::env::var("ASSISTANTS_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("client.base_url")
                    .with_details(base_url.clone())
                    .with_source("client_builder"),
            )
        })?;

        let timeout = self.timeout.or_else(|| {
            env_parse::<u64>("ASSISTANTS_HTTP_TIMEOUT_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
        });

        let transport = HttpTransport::new(
            &base_url,
            credential,
            timeout,
            self.beta_header.as_deref(),
        )?;
        Ok(AssistantsClient::from_transport(transport))
    }
}

impl Default for AssistantsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
