//! Prompt templates, answer parsers and the CoT engine for Fabula.
//!
//! A story is produced by chaining single-call stages. Each stage renders a
//! template from [`PromptTemplates`], sends it through a
//! [`FabulaDriver`](fabula_interface::FabulaDriver) and parses the answer
//! into a typed artifact.
//!
//! # Flows
//!
//! - **Plan**: [`CotEngine::draft_plan`] then [`CotEngine::review_plan`]
//! - **Story**: [`CotEngine::draft_story`] then [`CotEngine::review_story`]
//! - **Auxiliary**: elaborations, profiles, setting, twists, style, branches,
//!   refinement suggestions and clarifying questions, each one call
//!
//! A [`Drafted`] artifact can only be consumed by its review stage, and
//! [`CotEngine::generate_complete_story`] writes the story from the reviewed
//! revision. [`CotEngine::draft_story`] takes any
//! [`StoryPlan`](fabula_core::StoryPlan), so callers
//! that supply their own plan are responsible for having it reviewed.
//!
//! # Example
//!
//! ```rust,ignore
//! use fabula_models::{OpenAiClient, OpenAiConfig};
//! use fabula_narrative::{CotEngine, EngineConfig};
//!
//! # async fn example(request: fabula_core::StoryRequest) -> fabula_error::FabulaResult<()> {
//! let config = EngineConfig::load()?;
//! let client = OpenAiClient::new(OpenAiConfig::from_env())?;
//! let engine = CotEngine::with_config(client, config)?;
//!
//! let complete = engine.generate_complete_story(&request).await?;
//! println!("{}", complete.story().final_artifact());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod parse;
mod render;
mod requests;
mod roster;
mod stage;
mod state;
mod template;

pub use config::{EngineConfig, StageSettings};
pub use engine::{BRANCH_BOUNDS, CotEngine, ELABORATION_BOUNDS, NO_SUGGESTIONS, TWIST_BOUNDS};
pub use parse::{
    APPROVAL_FEEDBACK, BLANK_FEEDBACK, ReviewMarkers, parse_numbered_list, parse_profiles,
    parse_review, parse_setting,
};
pub use render::PromptFields;
pub use requests::{
    BranchRequest, BranchRequestBuilder, ClarifyRequest, ClarifyRequestBuilder,
    ElaborationRequest, ElaborationRequestBuilder, ProfileRequest, ProfileRequestBuilder,
    SettingRequest, SettingRequestBuilder, StyleRequest, StyleRequestBuilder, TwistRequest,
    TwistRequestBuilder,
};
pub use roster::{CreatureEntry, CreatureRoster};
pub use stage::{Sampling, Stage, TemplateField};
pub use state::{CompleteStory, Drafted, Reviewed};
pub use template::PromptTemplates;
