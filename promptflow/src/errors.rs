//! Error types for the promptflow pipeline core.
//!
//! Every failure the core can produce is a typed value. There is no retry
//! logic anywhere: callers receive the first failure as-is, together with
//! whatever partial results the run had produced.

use thiserror::Error;

/// The main error type for promptflow operations.
#[derive(Debug, Clone, Error)]
pub enum PromptflowError {
    /// No API credential was configured at startup.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// The completion call failed at the network or HTTP level.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The completion service answered successfully but without a usable choice.
    #[error("{0}")]
    MalformedResponse(#[from] MalformedResponseError),

    /// A template referenced a placeholder with no binding.
    #[error("{0}")]
    MissingBinding(#[from] MissingBindingError),

    /// The run was cancelled by the caller.
    #[error("run cancelled: {0}")]
    Cancelled(String),

    /// A pipeline or binding validation error occurred.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl PromptflowError {
    /// Creates a cancellation error with a reason.
    #[must_use]
    pub fn cancelled(reason: impl Into<String>) -> Self {
        Self::Cancelled(reason.into())
    }
}

/// Error raised when no API credential is available.
///
/// The credential is resolved once at process start; this error is a fatal
/// precondition, never a per-call failure.
#[derive(Debug, Clone, Error)]
#[error("no API credential configured; set the {env_var} environment variable")]
pub struct AuthError {
    /// The environment variable that was expected to hold the credential.
    pub env_var: String,
}

impl AuthError {
    /// Creates a new auth error naming the expected environment variable.
    #[must_use]
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }
}

/// Error raised when the completion call fails at the transport level.
///
/// The raw status and body are retained for diagnostics; callers decide
/// whether to show them or a friendly summary.
#[derive(Debug, Clone, Error)]
#[error(
    "completion request failed{}: {body}",
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
)]
pub struct TransportError {
    /// The HTTP status code, if the request reached the service.
    pub status: Option<u16>,
    /// The raw response body, or the transport error text.
    pub body: String,
}

impl TransportError {
    /// Creates a transport error for a non-success HTTP response.
    #[must_use]
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: body.into(),
        }
    }

    /// Creates a transport error for a network-level failure (no response).
    #[must_use]
    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            status: None,
            body: detail.into(),
        }
    }
}

/// Error raised when a success response carries no usable generated choice.
#[derive(Debug, Clone, Error)]
#[error("completion response had no usable choice: {detail}")]
pub struct MalformedResponseError {
    /// What was missing or unparseable in the response.
    pub detail: String,
}

impl MalformedResponseError {
    /// Creates a new malformed-response error.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Error raised when a template references a placeholder with no binding.
///
/// Rendering fails loudly instead of leaving the literal placeholder text
/// in the output.
#[derive(Debug, Clone, Error)]
#[error("missing binding for placeholder '{key}'")]
pub struct MissingBindingError {
    /// The placeholder name that had no binding.
    pub key: String,
}

impl MissingBindingError {
    /// Creates a new missing-binding error.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Error raised when pipeline construction or binding validation fails.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error, if any.
    pub stages: Vec<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}
