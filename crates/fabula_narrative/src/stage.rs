//! Stage catalogue: identifiers, template fields and default sampling.

use serde::{Deserialize, Serialize};

/// One named step of the pipeline, backed by one template and one model call.
///
/// # Examples
///
/// ```
/// use fabula_narrative::{Stage, TemplateField};
///
/// let stage: Stage = "plan_review".parse().unwrap();
/// assert_eq!(stage, Stage::PlanReview);
/// assert!(stage.fields().contains(&TemplateField::PlanDraft));
/// assert_eq!(stage.default_sampling().max_tokens, 2048);
/// ```
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Input refinement suggestions
    Suggestions,
    /// Initial story plan
    Plan,
    /// Plan review and revision
    PlanReview,
    /// Full story from a plan
    Story,
    /// Story review and revision
    StoryReview,
    /// Synopsis elaborations
    Elaboration,
    /// Character profiles
    Profiles,
    /// Setting description
    Setting,
    /// Plot twist suggestions
    Twists,
    /// Style and tone rewrite
    Style,
    /// Branching continuations
    Branching,
    /// One clarifying question for the user
    Clarify,
}

/// A named value a template may reference as `{{name}}`.
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
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemplateField {
    /// Story theme
    Theme,
    /// Genre label
    Genre,
    /// Creature list, formatted through the roster
    Creatures,
    /// Synopsis or idea
    Synopsis,
    /// "Yes" or "No"
    IncludeTraits,
    /// Creature named in example suggestions
    SuggestionContext,
    /// Finalized plan used as context
    Plan,
    /// Plan under review
    PlanDraft,
    /// Story under review
    StoryDraft,
    /// Story text to rewrite
    Story,
    /// Plan excerpt to twist
    Section,
    /// Target style or tone
    Style,
    /// Story fragment to continue
    Segment,
    /// Story developed so far
    StoryContext,
    /// Creature the clarifying question is about
    FocusCreature,
}

/// Sampling settings for one stage call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    /// Completion length limit
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Sampling {
    /// Create sampling settings.
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

use TemplateField as F;

const REQUEST_FIELDS: [TemplateField; 5] =
    [F::Theme, F::Genre, F::Creatures, F::Synopsis, F::IncludeTraits];

impl Stage {
    /// Every stage, in pipeline order.
    pub fn all() -> impl Iterator<Item = Stage> {
        <Stage as strum::IntoEnumIterator>::iter()
    }

    /// Fields the stage's template may reference.
    pub fn fields(&self) -> &'static [TemplateField] {
        match self {
            Stage::Suggestions => &[
                F::Theme,
                F::Genre,
                F::Creatures,
                F::Synopsis,
                F::IncludeTraits,
                F::SuggestionContext,
            ],
            Stage::Plan => &REQUEST_FIELDS,
            Stage::PlanReview => &[
                F::Theme,
                F::Genre,
                F::Creatures,
                F::Synopsis,
                F::IncludeTraits,
                F::PlanDraft,
            ],
            Stage::Story => &[
                F::Theme,
                F::Genre,
                F::Creatures,
                F::Synopsis,
                F::IncludeTraits,
                F::Plan,
            ],
            Stage::StoryReview => &[
                F::Theme,
                F::Genre,
                F::Creatures,
                F::Synopsis,
                F::IncludeTraits,
                F::Plan,
                F::StoryDraft,
            ],
            Stage::Elaboration => &[F::Theme, F::Genre, F::Creatures, F::Synopsis],
            Stage::Profiles => &[F::Theme, F::Genre, F::Creatures, F::Synopsis, F::Plan],
            Stage::Setting => &[F::Theme, F::Genre, F::Synopsis, F::Plan],
            Stage::Twists => &[F::Plan, F::Section],
            Stage::Style => &[F::Story, F::Theme, F::Genre, F::Style],
            Stage::Branching => &[F::Segment, F::Theme, F::Genre, F::Plan],
            Stage::Clarify => &[
                F::Theme,
                F::Genre,
                F::Creatures,
                F::Synopsis,
                F::StoryContext,
                F::FocusCreature,
            ],
        }
    }

    /// Sampling used unless configuration overrides it.
    ///
    /// The style stage's token limit is recomputed from the input length at
    /// call time; the value here is only its fallback.
    pub fn default_sampling(&self) -> Sampling {
        match self {
            Stage::Suggestions => Sampling::new(200, 0.5),
            Stage::Plan => Sampling::new(1536, 0.7),
            Stage::PlanReview => Sampling::new(2048, 0.7),
            Stage::Story => Sampling::new(4096, 0.75),
            Stage::StoryReview => Sampling::new(4096, 0.7),
            Stage::Elaboration => Sampling::new(1024, 0.7),
            Stage::Profiles => Sampling::new(1536, 0.6),
            Stage::Setting => Sampling::new(1024, 0.7),
            Stage::Twists => Sampling::new(768, 0.75),
            Stage::Style => Sampling::new(4096, 0.7),
            Stage::Branching => Sampling::new(1024, 0.7),
            Stage::Clarify => Sampling::new(256, 0.7),
        }
    }
}
