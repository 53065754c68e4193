//! Test doubles for pipeline runs.

use crate::client::CompletionClient;
use crate::errors::{PromptflowError, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// One recorded call to a [`ScriptedClient`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The rendered system instruction the runner sent.
    pub system_instruction: String,
    /// The rendered user message the runner sent.
    pub user_message: String,
}

/// A completion client that replays queued outcomes in order and records
/// every call it receives.
///
/// Queue one outcome per expected stage; an exhausted script fails the
/// call with a transport error so a test that under-queues fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<String, PromptflowError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    /// Creates a client with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful generation.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.outcomes.lock().push_back(Ok(text.into()));
        self
    }

    /// Queues a typed failure.
    #[must_use]
    pub fn with_failure(self, failure: impl Into<PromptflowError>) -> Self {
        self.outcomes.lock().push_back(Err(failure.into()));
        self
    }

    /// Returns the number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the recorded calls, in order.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, PromptflowError> {
        self.calls.lock().push(RecordedCall {
            system_instruction: system_instruction.to_string(),
            user_message: user_message.to_string(),
        });

        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("scripted client exhausted").into()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
