use crate::types::Credential;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credential: Credential,
}

impl HttpTransport {
    /// Build a transport that sends every request to `base_url` with
    /// `Authorization: Bearer <key>` and `Content-Type: application/json`.
    ///
    /// `timeout` of `None` leaves requests unbounded. `beta_header` is sent as
    /// `OpenAI-Beta` when present.
    pub fn new(
        base_url: &str,
        credential: Credential,
        timeout: Option<Duration>,
        beta_header: Option<&str>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(beta) = beta_header {
            let value = HeaderValue::from_str(beta).map_err(|e| {
                Error::configuration(format!("Invalid OpenAI-Beta header value: {}", e))
            })?;
            headers.insert(HeaderName::from_static("openai-beta"), value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(method = "POST", %url, "sending request");
        let request = self.client.post(&url).json(body);
        self.execute(request).await
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(method = "GET", %url, "sending request");
        let request = self.client.get(&url);
        self.execute(request).await
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(self.credential.expose())
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: remote_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Prefer the service's `error.message`, fall back to the raw body.
fn remote_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
