//! OpenAI-compatible chat completions.

mod client;
mod config;
mod conversion;
mod dto;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
pub use conversion::classify_status;
pub use dto::{
    ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse, ChatMessage,
    Choice, ChoiceMessage, Usage,
};
