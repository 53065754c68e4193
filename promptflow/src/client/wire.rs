//! Wire types for the chat-completion contract.
//!
//! The request carries exactly two role-tagged messages (system, user) and a
//! model identifier; the success response carries at least one choice whose
//! message content is the generated text. No conversation history, no
//! streaming.

use serde::{Deserialize, Serialize};

/// A single chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// The model identifier to invoke.
    pub model: String,
    /// The role-tagged messages, in order.
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Creates the two-message request every stage sends: one system
    /// instruction followed by one user message.
    #[must_use]
    pub fn two_message(
        model: impl Into<String>,
        system_instruction: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: system_instruction.into(),
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: user_message.into(),
                },
            ],
        }
    }
}

/// A role-tagged message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The message role.
    pub role: ChatRole,
    /// The message text.
    pub content: String,
}

/// The message roles the wire contract uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The system instruction role.
    System,
    /// The user message role.
    User,
}

/// A chat-completion success response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// The generated choices.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Extracts the first choice's message content, if present.
    #[must_use]
    pub fn into_first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

/// One generated choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The generated message.
    pub message: ChoiceMessage,
}

/// The message inside a generated choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// The generated text, absent in malformed responses.
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_shape_matches_wire_contract() {
        let request =
            ChatCompletionRequest::two_message("llama-3.1-8b-instant", "Be concise.", "hello");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "messages": [
                    {"role": "system", "content": "Be concise."},
                    {"role": "user", "content": "hello"},
                ],
            })
        );
    }

    #[test]
    fn test_response_first_content() {
        let body = r#"{"choices":[{"message":{"content":"generated"}},{"message":{"content":"second"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.into_first_content(), Some("generated".to_string()));
    }

    #[test]
    fn test_response_without_choices() {
        let response: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.into_first_content(), None);
    }

    #[test]
    fn test_response_choice_without_content() {
        let body = r#"{"choices":[{"message":{}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_first_content(), None);
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let body = r#"{"id":"cmpl-1","object":"chat.completion","choices":[{"index":0,"message":{"role":"assistant","content":"ok"},"finish_reason":"stop"}],"usage":{"total_tokens":10}}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_first_content(), Some("ok".to_string()));
    }
}
