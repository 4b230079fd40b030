//! Fabula - prompt-chaining story generation
//!
//! Fabula turns a handful of story parameters (theme, genre, creatures and an
//! optional synopsis) into a short creature adventure by chaining single-call
//! LLM stages: a plan is drafted and reviewed, then the story is written from
//! the reviewed plan and reviewed in turn. Auxiliary stages brainstorm
//! elaborations, character profiles, settings, twists, branches and style
//! rewrites.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabula::{CotEngine, EngineConfig, Genre, OpenAiClient, StoryRequest, client_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::load()?;
//!     let client = OpenAiClient::new(client_config(&config))?;
//!     let engine = CotEngine::with_config(client, config)?;
//!
//!     let request = StoryRequest::builder()
//!         .theme("友情")
//!         .genre(Genre::Adventure)
//!         .creatures(vec!["皮卡丘".to_string(), "伊布".to_string()])
//!         .build()?;
//!
//!     let complete = engine.generate_complete_story(&request).await?;
//!     println!("{}", complete.story().final_artifact());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `fabula_error` - Error types
//! - `fabula_core` - Requests, responses and story artifacts
//! - `fabula_interface` - `FabulaDriver` trait definition
//! - `fabula_models` - OpenAI-compatible client
//! - `fabula_narrative` - Templates, parsers and the CoT engine
//!
//! This crate (`fabula`) re-exports everything for convenience and ships the
//! `fabula` command-line tool.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod observability;

pub use fabula_core::*;
pub use fabula_error::*;
pub use fabula_interface::*;
pub use fabula_models::*;
pub use fabula_narrative::*;
pub use observability::{LogFormat, LoggingConfig, init_logging};

/// Client settings derived from engine configuration.
///
/// The API key is read from the variable named by `api_key_env`; a missing
/// key is only reported when the first request is sent.
///
/// # Examples
///
/// ```
/// use fabula::{EngineConfig, client_config};
///
/// let config = EngineConfig::from_toml_str("model = \"gpt-4.1-mini\"\ntimeout_secs = 45").unwrap();
/// let client = client_config(&config);
/// assert_eq!(client.model(), "gpt-4.1-mini");
/// assert_eq!(client.timeout().as_secs(), 45);
/// ```
pub fn client_config(config: &EngineConfig) -> OpenAiConfig {
    OpenAiConfig::new(config.model().clone())
        .with_base_url(config.base_url().clone())
        .with_timeout(config.timeout())
        .with_api_key_from_env(config.api_key_env().clone())
}
