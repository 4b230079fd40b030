//! Advisory artifacts produced by the auxiliary stages.
//!
//! None of these feed back into a plan or story automatically; the user
//! picks what to carry forward.

use fabula_error::{ParseError, ParseErrorKind};
use serde::{Deserialize, Serialize};

/// Inclusive range of acceptable item counts for a numbered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemBounds {
    /// Fewest acceptable items
    pub min: usize,
    /// Most acceptable items
    pub max: usize,
}

impl ItemBounds {
    /// Bounds from `min` to `max`, inclusive.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// True when `count` falls within the bounds.
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// One numbered suggestion: an elaboration, twist or branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct SuggestionItem {
    /// The number the model gave the item
    number: u32,
    /// Short title, when the item has one
    title: Option<String>,
    /// Explanation or description
    body: String,
}

impl SuggestionItem {
    /// Create an item.
    pub fn new(number: u32, title: Option<String>, body: impl Into<String>) -> Self {
        Self {
            number,
            title,
            body: body.into(),
        }
    }
}

/// A numbered list of suggestions together with the raw model answer.
///
/// # Examples
///
/// ```
/// use fabula_core::{ItemBounds, SuggestionItem, SuggestionList};
///
/// let list = SuggestionList::new(
///     vec![
///         SuggestionItem::new(1, Some("逆轉".into()), "盟友其實是幕後黑手"),
///         SuggestionItem::new(2, None, "意外的援手"),
///     ],
///     "1. ...\n2. ...",
/// );
/// assert!(list.check_bounds("plot_twist", ItemBounds::new(2, 3)).is_ok());
/// assert!(list.check_bounds("elaboration", ItemBounds::new(3, 4)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SuggestionList {
    /// Parsed items, in answer order
    items: Vec<SuggestionItem>,
    /// The unparsed answer
    raw: String,
}

impl SuggestionList {
    /// Create a list.
    pub fn new(items: Vec<SuggestionItem>, raw: impl Into<String>) -> Self {
        Self {
            items,
            raw: raw.into(),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no numbered item was found.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check the item count against a stage's contract.
    ///
    /// # Errors
    ///
    /// [`ParseErrorKind::ItemCount`] when the count is out of bounds.
    #[track_caller]
    pub fn check_bounds(&self, stage: &str, bounds: ItemBounds) -> Result<(), ParseError> {
        if bounds.contains(self.items.len()) {
            Ok(())
        } else {
            Err(ParseError::new(ParseErrorKind::ItemCount {
                stage: stage.to_string(),
                min: bounds.min,
                max: bounds.max,
                found: self.items.len(),
            }))
        }
    }
}

/// Profile of one creature in the story.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into, strip_option), default)]
pub struct CharacterProfile {
    /// Creature name, as the user listed it
    creature: String,
    /// Main personality traits
    personality: Option<String>,
    /// What the creature wants most in this story
    motivation: Option<String>,
    /// Inner struggle it may face
    inner_conflict: Option<String>,
    /// How it relates to the other characters
    relationships: Option<String>,
    /// A representative line of inner monologue
    monologue: Option<String>,
    /// The profile block as the model wrote it
    raw: String,
}

impl CharacterProfile {
    /// Start building a profile.
    pub fn builder() -> CharacterProfileBuilder {
        CharacterProfileBuilder::default()
    }
}

/// A detailed description of one story location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct SettingDescription {
    /// Invented location name, when the answer states one
    name: Option<String>,
    /// Full description
    description: String,
}

impl SettingDescription {
    /// Create a setting description.
    pub fn new(name: Option<String>, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into(),
        }
    }
}
