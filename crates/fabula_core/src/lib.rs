//! Core data types for the Fabula story engine.
//!
//! This crate holds the values that flow through the pipeline: the model
//! request/response envelope, the user's story parameters and every artifact
//! a stage can produce.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod genre;
mod message;
mod request;
mod role;
mod story;
mod suggestion;
mod text;

pub use artifact::{ArtifactState, FullStory, ReviewResult, StoryPlan};
pub use genre::Genre;
pub use message::{Message, MessageBuilder};
pub use request::{
    FinishReason, GenerateRequest, GenerateRequestBuilder, GenerateResponse, TokenUsage,
};
pub use role::Role;
pub use story::{DraftRequest, StoryRequest, StoryRequestBuilder};
pub use suggestion::{
    CharacterProfile, ItemBounds, SettingDescription, SuggestionItem, SuggestionList,
};
pub use text::estimate_word_count;
