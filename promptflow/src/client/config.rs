//! Completion client configuration.

use crate::errors::AuthError;
use serde::Deserialize;
use std::time::Duration;

/// The environment variable the credential is read from.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// The default chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// The default model identifier.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Configuration for the HTTP completion client.
///
/// The credential is resolved once at construction time and passed in
/// explicitly; there are no hidden environment lookups at call sites.
#[derive(Clone, Deserialize)]
pub struct CompletionConfig {
    /// The chat-completions endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// The API credential. Never serialized or logged.
    #[serde(default)]
    pub api_key: String,
    /// The model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> f64 {
    60.0
}

impl CompletionConfig {
    /// Creates a configuration with the given credential and defaults for
    /// everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: default_api_url(),
            api_key: api_key.into(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }

    /// Resolves the credential from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the variable is unset or empty. This check
    /// happens once at startup, not per call.
    pub fn from_env() -> Result<Self, AuthError> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(AuthError::new(API_KEY_ENV)),
        }
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Gets the timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

// Redacts the credential; configs end up in debug logs.
impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CompletionConfig::new("secret");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout_seconds, 60.0);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_builder() {
        let config = CompletionConfig::new("secret")
            .with_api_url("http://localhost:9999/v1/chat/completions")
            .with_model("test-model")
            .with_timeout(5.0);

        assert_eq!(config.api_url, "http://localhost:9999/v1/chat/completions");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = CompletionConfig::new("super-secret");
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_from_env_round_trip() {
        // Set-then-remove in one test; env mutation does not parallelize.
        std::env::set_var(API_KEY_ENV, "from-env-key");
        let config = CompletionConfig::from_env().unwrap();
        assert_eq!(config.api_key, "from-env-key");

        std::env::set_var(API_KEY_ENV, "   ");
        assert!(CompletionConfig::from_env().is_err());

        std::env::remove_var(API_KEY_ENV);
        let err = CompletionConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }
}
