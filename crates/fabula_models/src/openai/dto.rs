//! OpenAI chat-completions wire types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub(crate) model: String,
    /// Conversation messages
    pub(crate) messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_tokens: Option<u32>,
    /// Sampling temperature (0.0 - 2.0)
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) temperature: Option<f32>,
}

impl ChatCompletionRequest {
    /// Creates a new builder for `ChatCompletionRequest`.
    pub fn builder() -> ChatCompletionRequestBuilder {
        ChatCompletionRequestBuilder::default()
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    role: String,
    /// Message content
    content: String,
}

impl ChatMessage {
    /// Create a new message.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Chat completion response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChatCompletionResponse {
    /// Unique identifier for the completion
    #[serde(default)]
    id: Option<String>,
    /// Model used for completion
    #[serde(default)]
    model: Option<String>,
    /// Generated completions
    #[serde(default)]
    choices: Vec<Choice>,
    /// Token usage statistics
    #[serde(default)]
    usage: Option<Usage>,
}

/// A completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Choice {
    /// Index of this choice
    #[serde(default)]
    index: u32,
    /// The generated message
    message: ChoiceMessage,
    /// Reason why generation finished
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Message in a choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ChoiceMessage {
    /// Role of the message (typically "assistant")
    #[serde(default)]
    role: Option<String>,
    /// Generated content; null when the provider refused
    #[serde(default)]
    content: Option<String>,
    /// Refusal text some providers return instead of content
    #[serde(default)]
    refusal: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Usage {
    /// Tokens in the prompt
    #[serde(default)]
    prompt_tokens: u32,
    /// Tokens in the completion
    #[serde(default)]
    completion_tokens: u32,
    /// Total tokens used
    #[serde(default)]
    total_tokens: u32,
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) error: ApiErrorDetail,
}

/// Error details inside [`ApiErrorBody`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) code: Option<serde_json::Value>,
}
