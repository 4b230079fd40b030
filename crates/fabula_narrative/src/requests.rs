//! Plain-data inputs of the auxiliary stages.
//!
//! Each request validates itself before the engine renders a prompt, so a
//! blank required field never costs a model call.

use derive_builder::Builder;
use derive_getters::Getters;
use fabula_core::{Genre, StoryPlan, StoryRequest};
use fabula_error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};

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

#[track_caller]
fn require_creatures(creatures: &[String]) -> Result<(), ValidationError> {
    if creatures.is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::NoCreatures));
    }
    if let Some(index) = creatures.iter().position(|c| c.trim().is_empty()) {
        return Err(ValidationError::new(ValidationErrorKind::BlankCreature(
            index + 1,
        )));
    }
    Ok(())
}

/// Input of synopsis elaboration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct ElaborationRequest {
    /// Story theme
    theme: String,
    /// Genre, when chosen
    #[builder(default)]
    #[serde(default)]
    genre: Option<Genre>,
    /// Creatures, when chosen
    #[builder(default)]
    #[serde(default)]
    creatures: Vec<String>,
    /// Short synopsis or idea, when given
    #[builder(default)]
    #[serde(default)]
    synopsis: Option<String>,
}

impl ElaborationRequest {
    /// Start building a request.
    pub fn builder() -> ElaborationRequestBuilder {
        ElaborationRequestBuilder::default()
    }

    /// Reject a blank theme.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.theme.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyTheme));
        }
        Ok(())
    }
}

impl From<&StoryRequest> for ElaborationRequest {
    fn from(request: &StoryRequest) -> Self {
        Self {
            theme: request.theme().clone(),
            genre: Some(request.genre().clone()),
            creatures: request.creatures().clone(),
            synopsis: request.synopsis().clone(),
        }
    }
}

/// Input of character profile generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct ProfileRequest {
    /// Creatures to profile, in output order
    creatures: Vec<String>,
    /// Story theme
    theme: String,
    /// Story genre
    genre: Genre,
    /// Synopsis, when given
    #[builder(default)]
    #[serde(default)]
    synopsis: Option<String>,
    /// Existing plan for context
    #[builder(default)]
    #[serde(default)]
    plan: Option<StoryPlan>,
}

impl ProfileRequest {
    /// Start building a request.
    pub fn builder() -> ProfileRequestBuilder {
        ProfileRequestBuilder::default()
    }

    /// Profile every creature of a story request.
    pub fn for_story(request: &StoryRequest, plan: Option<StoryPlan>) -> Self {
        Self {
            creatures: request.creatures().clone(),
            theme: request.theme().clone(),
            genre: request.genre().clone(),
            synopsis: request.synopsis().clone(),
            plan,
        }
    }

    /// Reject an empty creature list, a blank creature or a blank theme.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_creatures(&self.creatures)?;
        if self.theme.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyTheme));
        }
        if self.genre.is_blank() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyGenre));
        }
        Ok(())
    }
}

/// Input of setting detailing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct SettingRequest {
    /// Story theme
    theme: String,
    /// Story genre
    genre: Genre,
    /// Synopsis, when given
    #[builder(default)]
    #[serde(default)]
    synopsis: Option<String>,
    /// Existing plan for context
    #[builder(default)]
    #[serde(default)]
    plan: Option<StoryPlan>,
}

impl SettingRequest {
    /// Start building a request.
    pub fn builder() -> SettingRequestBuilder {
        SettingRequestBuilder::default()
    }

    /// Describe the setting of a story request.
    pub fn for_story(request: &StoryRequest, plan: Option<StoryPlan>) -> Self {
        Self {
            theme: request.theme().clone(),
            genre: request.genre().clone(),
            synopsis: request.synopsis().clone(),
            plan,
        }
    }

    /// Reject a blank theme or genre.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.theme.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyTheme));
        }
        if self.genre.is_blank() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyGenre));
        }
        Ok(())
    }
}

/// Input of plot twist suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct TwistRequest {
    /// Plan to twist
    plan: StoryPlan,
    /// Excerpt of the plan to focus on
    #[builder(default)]
    #[serde(default)]
    section: Option<String>,
}

impl TwistRequest {
    /// Start building a request.
    pub fn builder() -> TwistRequestBuilder {
        TwistRequestBuilder::default()
    }

    /// Reject a blank plan.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(self.plan.text(), "plan")
    }
}

/// Input of style and tone tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct StyleRequest {
    /// Text to rewrite
    text: String,
    /// Target style or tone, e.g. "更幽默詼諧"
    style: String,
    /// Theme of the original story
    #[builder(default)]
    #[serde(default)]
    theme: Option<String>,
    /// Genre of the original story
    #[builder(default)]
    #[serde(default)]
    genre: Option<Genre>,
}

impl StyleRequest {
    /// Start building a request.
    pub fn builder() -> StyleRequestBuilder {
        StyleRequestBuilder::default()
    }

    /// Reject blank text or a blank style.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.text, "text")?;
        require(&self.style, "style")
    }
}

/// Input of story branching suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct BranchRequest {
    /// Story fragment to continue
    segment: String,
    /// Story theme
    #[builder(default)]
    #[serde(default)]
    theme: Option<String>,
    /// Story genre
    #[builder(default)]
    #[serde(default)]
    genre: Option<Genre>,
    /// Guiding plan
    #[builder(default)]
    #[serde(default)]
    plan: Option<StoryPlan>,
}

impl BranchRequest {
    /// Start building a request.
    pub fn builder() -> BranchRequestBuilder {
        BranchRequestBuilder::default()
    }

    /// Reject a blank segment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.segment, "segment")
    }
}

/// Input of the clarifying question stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct ClarifyRequest {
    /// The user's story request
    story: StoryRequest,
    /// Story developed so far
    context: String,
    /// Creature the question should be about; the first listed when absent
    #[builder(default)]
    #[serde(default)]
    focus_creature: Option<String>,
}

impl ClarifyRequest {
    /// Start building a request.
    pub fn builder() -> ClarifyRequestBuilder {
        ClarifyRequestBuilder::default()
    }

    /// Validate the story request and reject blank context.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.story.validate()?;
        require(&self.context, "context")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> StoryRequest {
        StoryRequest::builder()
            .theme("友情")
            .genre(Genre::Adventure)
            .creatures(vec!["皮卡丘".to_string(), "伊布".to_string()])
            .build()
            .expect("valid story request")
    }

    #[test]
    fn profile_request_copies_story_creatures() {
        let request = ProfileRequest::for_story(&story(), None);
        assert_eq!(request.creatures().len(), 2);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn profile_request_needs_creatures() {
        let request = ProfileRequest::builder()
            .creatures(Vec::<String>::new())
            .theme("友情")
            .genre(Genre::Comedy)
            .build()
            .expect("builder fields set");
        assert_eq!(
            request.validate().unwrap_err().kind,
            ValidationErrorKind::NoCreatures
        );
    }

    #[test]
    fn blank_style_is_named() {
        let request = StyleRequest::builder()
            .text("皮卡丘出發了。")
            .style("  ")
            .build()
            .expect("builder fields set");
        assert_eq!(
            request.validate().unwrap_err().kind,
            ValidationErrorKind::EmptyField("style".into())
        );
    }

    #[test]
    fn blank_plan_rejects_twists() {
        let request = TwistRequest::builder()
            .plan(StoryPlan::new(""))
            .build()
            .expect("builder fields set");
        assert!(request.validate().is_err());
    }

    #[test]
    fn clarify_validates_the_story() {
        let request = ClarifyRequest::builder()
            .story(story())
            .context("   ")
            .build()
            .expect("builder fields set");
        assert_eq!(
            request.validate().unwrap_err().kind,
            ValidationErrorKind::EmptyField("context".into())
        );
    }
}
