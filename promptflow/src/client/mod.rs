//! Completion client: one chat-completion request per pipeline stage.
//!
//! The [`CompletionClient`] trait is the seam between the pipeline runner
//! and the completion service; [`HttpCompletionClient`] is the production
//! transport, and [`crate::testing::ScriptedClient`] the test double.

mod config;
mod http;
mod wire;

pub use config::{CompletionConfig, API_KEY_ENV, DEFAULT_API_URL, DEFAULT_MODEL};
pub use http::HttpCompletionClient;
pub use wire::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, ChoiceMessage};

use crate::errors::PromptflowError;
use async_trait::async_trait;

/// Issues one request to a text-generation service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends a single (system, user) message pair and returns the generated
    /// text, or the typed failure that ended the call.
    ///
    /// Implementations must not retry: the first failure passes through to
    /// the caller.
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, PromptflowError>;

    /// Returns the model identifier this client invokes.
    fn model(&self) -> &str;
}
