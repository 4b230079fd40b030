//! LLM provider integrations for Fabula.
//!
//! The engine only needs one kind of backend: an OpenAI-compatible
//! chat-completions endpoint. [`OpenAiClient`] implements
//! [`FabulaDriver`](fabula_interface::FabulaDriver) for it and sorts every
//! failure into one of the tagged [`LlmErrorKind`](fabula_error::LlmErrorKind)
//! variants.
//!
//! # Example
//!
//! ```no_run
//! use fabula_core::{GenerateRequest, Message};
//! use fabula_interface::FabulaDriver;
//! use fabula_models::{OpenAiClient, OpenAiConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(OpenAiConfig::from_env())?;
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("說個故事")])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;

pub use openai::{
    ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse, ChatMessage,
    Choice, ChoiceMessage, OpenAiClient, OpenAiConfig, Usage, classify_status,
};
