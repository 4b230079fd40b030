//! User-supplied story parameters.

use crate::Genre;
use fabula_error::{ValidationError, ValidationErrorKind};
use serde::{Deserialize, Serialize};

/// Everything the user chose before generation starts.
///
/// Construct with [`StoryRequest::builder`]; call [`StoryRequest::validate`]
/// before handing it to a stage (the engine does this for you).
///
/// # Examples
///
/// ```
/// use fabula_core::{Genre, StoryRequest};
///
/// let request = StoryRequest::builder()
///     .theme("友情")
///     .genre(Genre::Adventure)
///     .creatures(vec!["皮卡丘".to_string(), "伊布".to_string()])
///     .build()
///     .unwrap();
///
/// assert!(request.validate().is_ok());
/// assert_eq!(request.synopsis_or("Not specified"), "Not specified");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct StoryRequest {
    /// Central theme, e.g. "友情"
    theme: String,
    /// Requested genre
    genre: Genre,
    /// Selected creatures, in the order the user listed them
    creatures: Vec<String>,
    /// Optional synopsis or story idea
    #[builder(default)]
    #[serde(default)]
    synopsis: Option<String>,
    /// Whether creature traits and abilities should feature in the story
    #[builder(default)]
    #[serde(default)]
    include_traits: bool,
}

impl StoryRequest {
    /// Start building a request.
    pub fn builder() -> StoryRequestBuilder {
        StoryRequestBuilder::default()
    }

    /// Reject requests that cannot produce a story.
    ///
    /// # Errors
    ///
    /// Blank theme, blank genre, empty creature list or a blank creature name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.theme.trim().is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyTheme));
        }
        if self.genre.is_blank() {
            return Err(ValidationError::new(ValidationErrorKind::EmptyGenre));
        }
        if self.creatures.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::NoCreatures));
        }
        if let Some(index) = self.creatures.iter().position(|c| c.trim().is_empty()) {
            return Err(ValidationError::new(ValidationErrorKind::BlankCreature(
                index + 1,
            )));
        }
        Ok(())
    }

    /// The synopsis, or `fallback` when none was given.
    pub fn synopsis_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.synopsis.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => fallback,
        }
    }

    /// Creature names with surrounding whitespace removed.
    pub fn creature_names(&self) -> Vec<&str> {
        self.creatures.iter().map(|c| c.trim()).collect()
    }
}

/// Possibly incomplete form state, used to ask for refinement suggestions.
///
/// Every field is optional because the user may not have filled them yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DraftRequest {
    /// Theme entered so far
    #[serde(default)]
    pub theme: Option<String>,
    /// Genre entered so far
    #[serde(default)]
    pub genre: Option<Genre>,
    /// Creatures entered so far
    #[serde(default)]
    pub creatures: Vec<String>,
    /// Synopsis entered so far
    #[serde(default)]
    pub synopsis: Option<String>,
    /// Whether traits should be included
    #[serde(default)]
    pub include_traits: bool,
}

impl From<&StoryRequest> for DraftRequest {
    fn from(request: &StoryRequest) -> Self {
        Self {
            theme: Some(request.theme.clone()),
            genre: Some(request.genre.clone()),
            creatures: request.creatures.clone(),
            synopsis: request.synopsis.clone(),
            include_traits: request.include_traits,
        }
    }
}
