//! Wire types for the chat-completions endpoint.

use serde::{Deserialize, Serialize};

use crate::types::Model;

/// Role of a message on the wire.
///
/// Unlike [`crate::types::MessageRole`] this includes `system`, which only ever appears in
/// outgoing requests.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    /// The persona directive.
    System,

    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

/// One `{role, content}` pair in a request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessageParam {
    /// The role of the message.
    pub role: WireRole,

    /// The content of the message.
    pub content: String,
}

impl ChatMessageParam {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::User,
            content: content.into(),
        }
    }
}

/// Body of a `POST {base}/chat/completions` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The model that will complete the prompt.
    pub model: Model,

    /// Input messages, persona first.
    pub messages: Vec<ChatMessageParam>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Build a single-turn request: the persona directive followed by exactly one user message.
    pub fn single_turn(
        model: Model,
        persona: &str,
        text: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            model,
            messages: vec![ChatMessageParam::system(persona), ChatMessageParam::user(text)],
            temperature,
            max_tokens,
        }
    }
}

/// A successful chat-completions response.
///
/// Only the fields this crate reads are modelled; everything else the provider sends is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Provider-assigned completion id.
    #[serde(default)]
    pub id: Option<String>,

    /// The model that served the request.
    #[serde(default)]
    pub model: Option<String>,

    /// Generated choices, in provider order.
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the provider returned one.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content.as_str())
    }
}

/// One generated choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// Position of this choice.
    #[serde(default)]
    pub index: u32,

    /// The generated message.
    pub message: ChoiceMessage,

    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The message inside a [`Choice`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// Role reported by the provider.
    #[serde(default)]
    pub role: Option<WireRole>,

    /// Generated text.
    pub content: String,
}

/// Error body returned with non-2xx responses: `{"error": {"message": ..}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// The error detail, when present.
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

/// Detail of a provider error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Provider error class.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Offending parameter.
    #[serde(default)]
    pub param: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;
    use serde_json::{json, to_value};

    #[test]
    fn single_turn_request_shape() {
        let request = ChatCompletionRequest::single_turn(
            Model::Known(KnownModel::Gpt35Turbo),
            "You are Ye.",
            "Tell me about your art",
            0.7,
            150,
        );
        let value = to_value(&request).unwrap();
        assert_eq!(value["model"], json!("gpt-3.5-turbo"));
        assert_eq!(
            value["messages"],
            json!([
                {"role": "system", "content": "You are Ye."},
                {"role": "user", "content": "Tell me about your art"},
            ])
        );
        assert_eq!(value["max_tokens"], json!(150));
        let temperature = value["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn response_reads_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("first"));
    }

    #[test]
    fn response_without_choices_has_no_text() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn error_body_is_lenient() {
        let parsed: ErrorResponse = serde_json::from_value(json!({
            "error": {"message": "Incorrect API key", "type": "invalid_request_error", "param": null}
        }))
        .unwrap();
        let detail = parsed.error.unwrap();
        assert_eq!(detail.message.as_deref(), Some("Incorrect API key"));
        assert_eq!(detail.error_type.as_deref(), Some("invalid_request_error"));

        let parsed: ErrorResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.error.is_none());
    }
}
