//! The CoT engine: every stage as one templated model call.
//!
//! Plan and story each run as a draft followed by a review. The remaining
//! stages are independent, advisory calls whose results never feed back into
//! a plan or story on their own.

use crate::parse::{
    ReviewMarkers, parse_numbered_list, parse_profiles, parse_review, parse_setting,
};
use crate::{
    BranchRequest, ClarifyRequest, CompleteStory, CreatureRoster, Drafted, ElaborationRequest,
    EngineConfig, ProfileRequest, PromptFields, PromptTemplates, Reviewed, Sampling,
    SettingRequest, Stage, StyleRequest, TemplateField as F, TwistRequest,
};
use fabula_core::{
    CharacterProfile, DraftRequest, FullStory, GenerateRequest, ItemBounds, Message,
    ReviewResult, SettingDescription, StoryPlan, StoryRequest, SuggestionList,
    estimate_word_count,
};
use fabula_error::{
    FabulaResult, LlmError, LlmErrorKind, ParseError, ParseErrorKind, ValidationError,
    ValidationErrorKind,
};
use fabula_interface::FabulaDriver;
use std::time::Instant;

const NOT_SPECIFIED: &str = "Not specified";
const ANY_GENRE: &str = "Any";
const NO_CREATURES: &str = "None specified";
const GENERIC_CREATURE: &str = "the creature";
const NO_PLAN: &str = "N/A";
const WHOLE_PLAN: &str = "(Overall Plan or Climax)";

/// Answer of the suggestion stage when the model has nothing to add.
pub const NO_SUGGESTIONS: &str =
    "No specific suggestions at this time, your input looks quite comprehensive!";

/// Item counts the elaboration stage promises.
pub const ELABORATION_BOUNDS: ItemBounds = ItemBounds::new(3, 4);
/// Item counts the plot twist stage promises.
pub const TWIST_BOUNDS: ItemBounds = ItemBounds::new(2, 3);
/// Item counts the branching stage promises.
pub const BRANCH_BOUNDS: ItemBounds = ItemBounds::new(2, 3);

/// Drives a [`FabulaDriver`] through the story stages.
///
/// The engine holds no per-request state, so one instance can serve many
/// concurrent callers when `D` is shared (e.g. an `Arc`).
///
/// # Examples
///
/// ```no_run
/// use fabula_core::{Genre, StoryRequest};
/// use fabula_interface::FabulaDriver;
/// use fabula_narrative::CotEngine;
///
/// # async fn run(driver: impl FabulaDriver) -> fabula_error::FabulaResult<()> {
/// let engine = CotEngine::new(driver)?;
///
/// let request = StoryRequest::builder()
///     .theme("友情")
///     .genre(Genre::Adventure)
///     .creatures(vec!["皮卡丘".to_string(), "伊布".to_string()])
///     .build()
///     .unwrap();
///
/// let plan = engine.generate_plan(&request).await?;
/// let story = engine.generate_story(&request, plan.final_artifact()).await?;
/// println!("{}", story.final_artifact());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CotEngine<D: FabulaDriver> {
    driver: D,
    templates: PromptTemplates,
    roster: CreatureRoster,
    config: EngineConfig,
}

impl<D: FabulaDriver> CotEngine<D> {
    /// Engine with bundled templates, bundled roster and default settings.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled data does not load.
    pub fn new(driver: D) -> FabulaResult<Self> {
        Ok(Self {
            driver,
            templates: PromptTemplates::bundled()?,
            roster: CreatureRoster::bundled()?,
            config: EngineConfig::default(),
        })
    }

    /// Engine configured from `config`, including its override files.
    ///
    /// # Errors
    ///
    /// Template or roster override files that cannot be read or rejected
    /// by validation.
    #[tracing::instrument(skip(driver, config), fields(provider = driver.provider_name(), model = %config.model()))]
    pub fn with_config(driver: D, config: EngineConfig) -> FabulaResult<Self> {
        let mut templates = PromptTemplates::bundled()?;
        if let Some(path) = config.templates() {
            tracing::debug!(path = %path.display(), "Merging template overrides");
            templates.merge_file(path)?;
        }
        let roster = match config.roster() {
            Some(path) => CreatureRoster::from_file(path)?,
            None => CreatureRoster::bundled()?,
        };
        Ok(Self {
            driver,
            templates,
            roster,
            config,
        })
    }

    /// Replace the template store.
    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Replace the creature roster.
    pub fn with_roster(mut self, roster: CreatureRoster) -> Self {
        self.roster = roster;
        self
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active templates.
    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    /// Active creature roster.
    pub fn roster(&self) -> &CreatureRoster {
        &self.roster
    }

    // ---- input refinement ----

    /// Suggest one or two ways to improve a partially filled request.
    ///
    /// Blank fields are described to the model as unspecified. An empty
    /// answer becomes [`NO_SUGGESTIONS`].
    #[tracing::instrument(skip(self, draft))]
    pub async fn suggest_refinements(&self, draft: &DraftRequest) -> FabulaResult<String> {
        let creatures: Vec<&str> = draft
            .creatures
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        let creature_list = if creatures.is_empty() {
            NO_CREATURES.to_string()
        } else {
            self.roster.format_list(&creatures)
        };
        let genre = draft
            .genre
            .as_ref()
            .filter(|g| !g.is_blank())
            .map(ToString::to_string)
            .unwrap_or_else(|| ANY_GENRE.to_string());

        let fields = PromptFields::new()
            .with(F::Theme, non_blank_or(draft.theme.as_deref(), NOT_SPECIFIED))
            .with(F::Genre, genre)
            .with(F::Creatures, creature_list)
            .with(F::Synopsis, non_blank_or(draft.synopsis.as_deref(), NOT_SPECIFIED))
            .with(F::IncludeTraits, yes_no(draft.include_traits))
            .with(
                F::SuggestionContext,
                creatures.first().copied().unwrap_or(GENERIC_CREATURE),
            );

        let text = self.call(Stage::Suggestions, &fields).await?;
        if text.is_empty() {
            tracing::info!("Model had no refinement suggestions");
            return Ok(NO_SUGGESTIONS.to_string());
        }
        Ok(text)
    }

    // ---- plan ----

    /// Write the first draft of a story plan.
    #[tracing::instrument(skip(self, request), fields(theme = %request.theme(), creatures = request.creatures().len()))]
    pub async fn draft_plan(&self, request: &StoryRequest) -> FabulaResult<Drafted<StoryPlan>> {
        request.validate()?;
        let fields = self.request_fields(request);
        let text = self.call_nonempty(Stage::Plan, &fields).await?;
        Ok(Drafted::new(StoryPlan::new(text)))
    }

    /// Review a drafted plan and return the reviewer's revision.
    ///
    /// # Errors
    ///
    /// [`ParseErrorKind::MalformedReview`] when the answer lacks the review
    /// markers, besides validation and driver errors.
    #[tracing::instrument(skip(self, request, draft))]
    pub async fn review_plan(
        &self,
        request: &StoryRequest,
        draft: Drafted<StoryPlan>,
    ) -> FabulaResult<Reviewed<StoryPlan>> {
        request.validate()?;
        let original = draft.into_inner();
        let fields = self
            .request_fields(request)
            .with(F::PlanDraft, original.text());
        let raw = self.call_nonempty(Stage::PlanReview, &fields).await?;

        let (feedback, revised) =
            reviewed_parts("plan", parse_review(&raw, &ReviewMarkers::PLAN, original.text()))?;
        let reviewed = Reviewed::new(original, feedback, StoryPlan::new(revised));
        tracing::info!(revised = reviewed.was_revised(), "Plan reviewed");
        Ok(reviewed)
    }

    /// Draft a plan and review it.
    #[tracing::instrument(skip(self, request))]
    pub async fn generate_plan(&self, request: &StoryRequest) -> FabulaResult<Reviewed<StoryPlan>> {
        let draft = self.draft_plan(request).await?;
        self.review_plan(request, draft).await
    }

    // ---- story ----

    /// Write the first draft of the full story from a plan, normally the
    /// final artifact of [`CotEngine::generate_plan`].
    #[tracing::instrument(skip(self, request, plan))]
    pub async fn draft_story(
        &self,
        request: &StoryRequest,
        plan: &StoryPlan,
    ) -> FabulaResult<Drafted<FullStory>> {
        request.validate()?;
        require(plan.text(), "plan")?;
        let fields = self.request_fields(request).with(F::Plan, plan.text());
        let text = self.call_nonempty(Stage::Story, &fields).await?;
        let story = FullStory::new(text);
        tracing::debug!(words = story.word_count(), "Story drafted");
        Ok(Drafted::new(story))
    }

    /// Review a drafted story against its plan.
    #[tracing::instrument(skip(self, request, plan, draft))]
    pub async fn review_story(
        &self,
        request: &StoryRequest,
        plan: &StoryPlan,
        draft: Drafted<FullStory>,
    ) -> FabulaResult<Reviewed<FullStory>> {
        request.validate()?;
        require(plan.text(), "plan")?;
        let original = draft.into_inner();
        let fields = self
            .request_fields(request)
            .with(F::Plan, plan.text())
            .with(F::StoryDraft, original.text());
        let raw = self.call_nonempty(Stage::StoryReview, &fields).await?;

        let (feedback, revised) = reviewed_parts(
            "story",
            parse_review(&raw, &ReviewMarkers::STORY, original.text()),
        )?;
        let reviewed = Reviewed::new(original, feedback, FullStory::new(revised));
        tracing::info!(
            revised = reviewed.was_revised(),
            words = reviewed.final_artifact().word_count(),
            "Story reviewed"
        );
        Ok(reviewed)
    }

    /// Draft a story from `plan` and review it.
    #[tracing::instrument(skip(self, request, plan))]
    pub async fn generate_story(
        &self,
        request: &StoryRequest,
        plan: &StoryPlan,
    ) -> FabulaResult<Reviewed<FullStory>> {
        let draft = self.draft_story(request, plan).await?;
        self.review_story(request, plan, draft).await
    }

    /// Plan, review, write and review: four calls in order.
    #[tracing::instrument(skip(self, request))]
    pub async fn generate_complete_story(
        &self,
        request: &StoryRequest,
    ) -> FabulaResult<CompleteStory> {
        let plan = self.generate_plan(request).await?;
        let story = self.generate_story(request, plan.final_artifact()).await?;
        Ok(CompleteStory::new(plan, story))
    }

    // ---- auxiliary stages ----

    /// Propose three or four ways to flesh out a synopsis.
    #[tracing::instrument(skip(self, request), fields(theme = %request.theme()))]
    pub async fn elaborate_synopsis(
        &self,
        request: &ElaborationRequest,
    ) -> FabulaResult<SuggestionList> {
        request.validate()?;
        let creatures: Vec<&str> = request.creatures().iter().map(|c| c.trim()).collect();
        let creature_list = if creatures.iter().all(|c| c.is_empty()) {
            NO_CREATURES.to_string()
        } else {
            self.roster.format_list(&creatures)
        };
        let fields = PromptFields::new()
            .with(F::Theme, request.theme().trim())
            .with(F::Genre, genre_or_any(request.genre().as_ref()))
            .with(F::Creatures, creature_list)
            .with(F::Synopsis, non_blank_or(request.synopsis().as_deref(), NOT_SPECIFIED));

        self.numbered(Stage::Elaboration, &fields, ELABORATION_BOUNDS)
            .await
    }

    /// One profile per requested creature, in request order.
    #[tracing::instrument(skip(self, request), fields(creatures = request.creatures().len()))]
    pub async fn develop_characters(
        &self,
        request: &ProfileRequest,
    ) -> FabulaResult<Vec<CharacterProfile>> {
        request.validate()?;
        let names: Vec<&str> = request.creatures().iter().map(|c| c.trim()).collect();
        let fields = PromptFields::new()
            .with(F::Theme, request.theme().trim())
            .with(F::Genre, request.genre().to_string())
            .with(F::Creatures, self.roster.format_list(&names))
            .with(F::Synopsis, non_blank_or(request.synopsis().as_deref(), NOT_SPECIFIED))
            .with(F::Plan, plan_or_na(request.plan().as_ref()));

        let raw = self.call_nonempty(Stage::Profiles, &fields).await?;
        let profiles = parse_profiles(&raw, &names, &self.roster)?;
        tracing::debug!(profiles = profiles.len(), "Parsed character profiles");
        Ok(profiles)
    }

    /// Describe where the story takes place.
    #[tracing::instrument(skip(self, request))]
    pub async fn detail_setting(
        &self,
        request: &SettingRequest,
    ) -> FabulaResult<SettingDescription> {
        request.validate()?;
        let fields = PromptFields::new()
            .with(F::Theme, request.theme().trim())
            .with(F::Genre, request.genre().to_string())
            .with(F::Synopsis, non_blank_or(request.synopsis().as_deref(), NOT_SPECIFIED))
            .with(F::Plan, plan_or_na(request.plan().as_ref()));

        let raw = self.call_nonempty(Stage::Setting, &fields).await?;
        let setting = parse_setting(&raw);
        tracing::debug!(name = ?setting.name(), "Parsed setting");
        Ok(setting)
    }

    /// Propose two or three twists for a plan.
    #[tracing::instrument(skip(self, request))]
    pub async fn suggest_plot_twists(&self, request: &TwistRequest) -> FabulaResult<SuggestionList> {
        request.validate()?;
        let fields = PromptFields::new()
            .with(F::Plan, request.plan().text())
            .with(F::Section, non_blank_or(request.section().as_deref(), WHOLE_PLAN));

        self.numbered(Stage::Twists, &fields, TWIST_BOUNDS).await
    }

    /// Rewrite text in another style, keeping its plot and characters.
    ///
    /// The token budget grows with the input: estimated words times two plus
    /// 512, capped by `max_style_tokens`.
    #[tracing::instrument(skip(self, request), fields(style = %request.style()))]
    pub async fn tune_style(&self, request: &StyleRequest) -> FabulaResult<String> {
        request.validate()?;
        let fields = PromptFields::new()
            .with(F::Story, request.text().trim())
            .with(F::Theme, non_blank_or(request.theme().as_deref(), NOT_SPECIFIED))
            .with(F::Genre, genre_or_any(request.genre().as_ref()))
            .with(F::Style, request.style().trim());

        let sampling = Sampling::new(
            self.style_budget(request.text()),
            self.config.sampling(Stage::Style).temperature,
        );
        let text = self.call_with(Stage::Style, &fields, sampling).await?;
        if text.is_empty() {
            return Err(empty_answer(Stage::Style).into());
        }
        Ok(text)
    }

    /// Propose two or three ways the story could continue.
    #[tracing::instrument(skip(self, request))]
    pub async fn suggest_branches(&self, request: &BranchRequest) -> FabulaResult<SuggestionList> {
        request.validate()?;
        let fields = PromptFields::new()
            .with(F::Segment, request.segment().trim())
            .with(F::Theme, non_blank_or(request.theme().as_deref(), NOT_SPECIFIED))
            .with(F::Genre, genre_or_any(request.genre().as_ref()))
            .with(F::Plan, plan_or_na(request.plan().as_ref()));

        self.numbered(Stage::Branching, &fields, BRANCH_BOUNDS).await
    }

    /// Ask the user one question about a creature's choices.
    #[tracing::instrument(skip(self, request))]
    pub async fn ask_clarifying_question(&self, request: &ClarifyRequest) -> FabulaResult<String> {
        request.validate()?;
        let story = request.story();
        let focus = request
            .focus_creature()
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| story.creature_names().first().copied())
            .unwrap_or(GENERIC_CREATURE);

        let fields = PromptFields::new()
            .with(F::Theme, story.theme().trim())
            .with(F::Genre, story.genre().to_string())
            .with(F::Creatures, self.roster.format_list(&story.creature_names()))
            .with(F::Synopsis, story.synopsis_or(NOT_SPECIFIED))
            .with(F::StoryContext, request.context().trim())
            .with(F::FocusCreature, self.roster.display_name(focus));

        self.call_nonempty(Stage::Clarify, &fields).await
    }

    // ---- plumbing ----

    fn request_fields(&self, request: &StoryRequest) -> PromptFields {
        PromptFields::new()
            .with(F::Theme, request.theme().trim())
            .with(F::Genre, request.genre().to_string())
            .with(F::Creatures, self.roster.format_list(&request.creature_names()))
            .with(F::Synopsis, request.synopsis_or(NOT_SPECIFIED))
            .with(F::IncludeTraits, yes_no(*request.include_traits()))
    }

    fn style_budget(&self, text: &str) -> u32 {
        let estimate = u32::try_from(estimate_word_count(text)).unwrap_or(u32::MAX);
        estimate
            .saturating_mul(2)
            .saturating_add(512)
            .min(*self.config.max_style_tokens())
    }

    async fn numbered(
        &self,
        stage: Stage,
        fields: &PromptFields,
        bounds: ItemBounds,
    ) -> FabulaResult<SuggestionList> {
        let raw = self.call_nonempty(stage, fields).await?;
        let list = parse_numbered_list(&raw);
        if let Err(e) = list.check_bounds(stage.as_ref(), bounds) {
            if *self.config.strict_item_counts() {
                return Err(e.into());
            }
            tracing::warn!(
                stage = %stage,
                found = list.len(),
                min = bounds.min,
                max = bounds.max,
                "Item count out of bounds"
            );
        }
        Ok(list)
    }

    async fn call_nonempty(&self, stage: Stage, fields: &PromptFields) -> FabulaResult<String> {
        let text = self.call(stage, fields).await?;
        if text.is_empty() {
            return Err(empty_answer(stage).into());
        }
        Ok(text)
    }

    async fn call(&self, stage: Stage, fields: &PromptFields) -> FabulaResult<String> {
        self.call_with(stage, fields, self.config.sampling(stage))
            .await
    }

    /// Render, send and trim. The driver's own model answers.
    #[tracing::instrument(skip(self, fields, sampling), fields(stage = %stage, max_tokens = sampling.max_tokens))]
    async fn call_with(
        &self,
        stage: Stage,
        fields: &PromptFields,
        sampling: Sampling,
    ) -> FabulaResult<String> {
        let prompt = self.templates.render(stage, fields)?;
        let request = GenerateRequest::builder()
            .messages(vec![Message::user(prompt)])
            .max_tokens(Some(sampling.max_tokens))
            .temperature(Some(sampling.temperature))
            .build()
            .map_err(|e| ValidationError::new(ValidationErrorKind::Incomplete(e.to_string())))?;

        tracing::debug!(prompt_chars = request.prompt_chars(), "Calling model");
        let started = Instant::now();
        let response = self.driver.generate(&request).await.map_err(|e| {
            tracing::warn!(stage = %stage, error = %e, "Stage call failed");
            e
        })?;

        tracing::info!(
            stage = %stage,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = response.text().chars().count(),
            "Stage complete"
        );
        Ok(response.into_text().trim().to_string())
    }
}

fn reviewed_parts(artifact: &str, result: ReviewResult) -> Result<(String, String), ParseError> {
    match result {
        ReviewResult::Parsed { feedback, revised } => Ok((feedback, revised)),
        ReviewResult::MalformedResponse { reason } => {
            tracing::warn!(artifact, reason = %reason, "Malformed review");
            Err(ParseError::new(ParseErrorKind::MalformedReview {
                artifact: artifact.to_string(),
                reason,
            }))
        }
    }
}

#[track_caller]
fn empty_answer(stage: Stage) -> LlmError {
    LlmError::new(LlmErrorKind::MalformedResponse(format!(
        "empty completion for stage {}",
        stage
    )))
}

#[track_caller]
fn require(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(ValidationErrorKind::EmptyField(
            field.to_string(),
        )))
    } else {
        Ok(())
    }
}

fn non_blank_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => fallback,
    }
}

fn genre_or_any(genre: Option<&fabula_core::Genre>) -> String {
    genre
        .filter(|g| !g.is_blank())
        .map(ToString::to_string)
        .unwrap_or_else(|| ANY_GENRE.to_string())
}

fn plan_or_na(plan: Option<&StoryPlan>) -> &str {
    plan.map(StoryPlan::text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(NO_PLAN)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
