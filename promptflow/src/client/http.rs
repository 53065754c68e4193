//! HTTP completion client over reqwest.

use super::config::CompletionConfig;
use super::wire::{ChatCompletionRequest, ChatCompletionResponse};
use super::CompletionClient;
use crate::errors::{MalformedResponseError, PromptflowError, TransportError};
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

/// A completion client that speaks the OpenAI-compatible chat-completions
/// wire contract over HTTP.
///
/// One request per call, two role-tagged messages, no streaming, no retries.
/// A failed call is surfaced to the caller as a typed failure and ends the
/// pipeline run.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    config: CompletionConfig,
    http: reqwest::Client,
}

impl HttpCompletionClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a transport failure if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: CompletionConfig) -> Result<Self, PromptflowError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::network(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Creates a client with the credential resolved from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`PromptflowError::Auth`] if no credential is configured.
    pub fn from_env() -> Result<Self, PromptflowError> {
        Self::new(CompletionConfig::from_env()?)
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, PromptflowError> {
        let request = ChatCompletionRequest::two_message(
            &self.config.model,
            system_instruction,
            user_message,
        );

        let started = Instant::now();
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::http(status.as_u16(), body).into());
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| MalformedResponseError::new(format!("unparseable body: {e}")))?;

        let content = parsed
            .into_first_content()
            .ok_or_else(|| MalformedResponseError::new("no choice with message content"))?;

        debug!(
            model = %self.config.model,
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            chars = content.len(),
            "completion returned"
        );

        Ok(content)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
