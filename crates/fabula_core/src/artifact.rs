//! Plan and story artifacts.

use crate::estimate_word_count;
use serde::{Deserialize, Serialize};

/// Where a plan or story is in its draft/review lifecycle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum ArtifactState {
    /// Nothing generated yet
    #[default]
    NotStarted,
    /// First draft exists but has not been reviewed
    Drafted,
    /// Reviewed; the artifact is final
    Reviewed,
}

/// A story outline, normally three to five major sections.
///
/// # Examples
///
/// ```
/// use fabula_core::StoryPlan;
///
/// let plan = StoryPlan::new("*   開端：皮卡丘迷路了\n*   高潮：伊布出手相救\n*   結局：兩者成為好友");
/// assert_eq!(plan.sections().len(), 3);
/// assert!(plan.mentions("伊布"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct StoryPlan(String);

impl StoryPlan {
    /// Wrap plan text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The plan text.
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Consume the plan, returning its text.
    pub fn into_text(self) -> String {
        self.0
    }

    /// True when the plan mentions `name`.
    pub fn mentions(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Split the plan into its top-level sections.
    ///
    /// A section starts at an unindented heading, bullet or numbered line
    /// and runs until the next one. Text with no such markers is a single
    /// section.
    pub fn sections(&self) -> Vec<String> {
        let mut sections: Vec<String> = Vec::new();
        let mut current: Option<String> = None;

        for line in self.0.lines() {
            if is_section_start(line) {
                if let Some(section) = current.take() {
                    sections.push(section.trim_end().to_string());
                }
                current = Some(line.trim().to_string());
            } else if let Some(section) = current.as_mut() {
                section.push('\n');
                section.push_str(line);
            }
        }
        if let Some(section) = current {
            sections.push(section.trim_end().to_string());
        }

        if sections.is_empty() && !self.0.trim().is_empty() {
            sections.push(self.0.trim().to_string());
        }
        sections
    }
}

fn is_section_start(line: &str) -> bool {
    if line.trim().is_empty() || line.starts_with(char::is_whitespace) {
        return false;
    }
    if line.starts_with(['#', '*', '-', '•']) || line.starts_with('第') {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with(['.', ')', '、', '．'])
}

/// A complete story, targeting 1000 to 1500 words.
///
/// # Examples
///
/// ```
/// use fabula_core::FullStory;
///
/// let story = FullStory::new("皮卡丘和伊布一起出發了。");
/// assert_eq!(story.word_count(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct FullStory(String);

impl FullStory {
    /// Wrap story text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The story text.
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Consume the story, returning its text.
    pub fn into_text(self) -> String {
        self.0
    }

    /// CJK-aware word estimate.
    pub fn word_count(&self) -> usize {
        estimate_word_count(&self.0)
    }

    /// True when the story mentions `name`.
    pub fn mentions(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// What a reviewer's answer parsed into.
///
/// Reviewer output is an informal text contract, so a parse can fail
/// without the model call failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewResult {
    /// Both sections were found
    Parsed {
        /// Reviewer's assessment
        feedback: String,
        /// Revised artifact text
        revised: String,
    },
    /// The answer could not be split into feedback and revision
    MalformedResponse {
        /// What was missing or empty
        reason: String,
    },
}

impl ReviewResult {
    /// True for [`ReviewResult::Parsed`].
    pub fn is_parsed(&self) -> bool {
        matches!(self, ReviewResult::Parsed { .. })
    }
}
