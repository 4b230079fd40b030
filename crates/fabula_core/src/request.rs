//! Request and response types for LLM generation.

use crate::Message;
use serde::{Deserialize, Serialize};

/// A single completion request: rendered prompt plus sampling settings.
///
/// # Examples
///
/// ```
/// use fabula_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Hello!")])
///     .max_tokens(Some(100))
///     .temperature(Some(0.7))
///     .model(Some("gpt-4.1".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(*request.max_tokens(), Some(100));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Default,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Model identifier; the driver's own model when absent
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Concatenated text of every message, for size logging.
    pub fn prompt_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content().chars().count()).sum()
    }
}

/// Why the model stopped generating.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum FinishReason {
    /// Model completed naturally
    #[default]
    Stop,
    /// Hit the max_tokens limit
    Length,
    /// Output was withheld by the provider's content filter
    ContentFilter,
    /// Anything else the provider reports
    Other,
}

impl FinishReason {
    /// Map an OpenAI-style finish reason string.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_core::FinishReason;
    ///
    /// assert_eq!(FinishReason::from_wire("length"), FinishReason::Length);
    /// assert_eq!(FinishReason::from_wire("tool_calls"), FinishReason::Other);
    /// ```
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Other,
        }
    }
}

/// Token accounting reported by the provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct TokenUsage {
    /// Tokens in the prompt
    prompt_tokens: u32,
    /// Tokens in the completion
    completion_tokens: u32,
}

impl TokenUsage {
    /// Create a usage record.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Prompt plus completion tokens.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// The completion returned by a driver.
///
/// # Examples
///
/// ```
/// use fabula_core::{FinishReason, GenerateResponse};
///
/// let response = GenerateResponse::new("從前從前……");
/// assert_eq!(response.text(), "從前從前……");
/// assert_eq!(*response.finish_reason(), FinishReason::Stop);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GenerateResponse {
    /// Completion text
    text: String,
    /// Why generation stopped
    finish_reason: FinishReason,
    /// Token usage, when the provider reports it
    usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// A completion that stopped naturally.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: FinishReason::Stop,
            usage: None,
        }
    }

    /// Set the finish reason.
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = reason;
        self
    }

    /// Attach token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Consume the response, keeping only the text.
    pub fn into_text(self) -> String {
        self.text
    }
}
