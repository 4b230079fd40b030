//! Draft and review lifecycle of plans and stories.
//!
//! A [`Drafted`] value can only come out of a generation stage and can only
//! go into the matching review stage, which yields the terminal
//! [`Reviewed`]. There is no way to skip the review or to review twice.

use derive_getters::Getters;
use fabula_core::{ArtifactState, FullStory, StoryPlan};
use serde::Serialize;

/// An artifact that has been generated but not yet reviewed.
///
/// Drafts are moved into their review and cannot be duplicated:
///
/// ```compile_fail
/// fn duplicate<T: Clone>(value: &T) -> T {
///     value.clone()
/// }
/// # fn check(draft: fabula_narrative::Drafted<fabula_core::StoryPlan>) {
/// let _copy = duplicate(&draft);
/// # }
/// ```
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Drafted<T> {
    artifact: T,
}

impl<T> Drafted<T> {
    pub(crate) fn new(artifact: T) -> Self {
        Self { artifact }
    }

    /// Read-only view of the unreviewed draft, for display.
    pub fn preview(&self) -> &T {
        &self.artifact
    }

    /// Always [`ArtifactState::Drafted`].
    pub fn state(&self) -> ArtifactState {
        ArtifactState::Drafted
    }

    pub(crate) fn into_inner(self) -> T {
        self.artifact
    }
}

/// A reviewed artifact: the draft, the reviewer's feedback and the revision.
///
/// The revision is authoritative for downstream stages. The original draft is
/// kept so callers can show both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Reviewed<T> {
    /// The draft that was reviewed
    original: T,
    /// Reviewer's assessment, never empty
    feedback: String,
    /// Revised artifact, identical to `original` when the reviewer approved
    revised: T,
}

impl<T> Reviewed<T> {
    pub(crate) fn new(original: T, feedback: String, revised: T) -> Self {
        Self {
            original,
            feedback,
            revised,
        }
    }

    /// The artifact to use from here on.
    pub fn final_artifact(&self) -> &T {
        &self.revised
    }

    /// Consume the review, keeping the final artifact.
    pub fn into_final(self) -> T {
        self.revised
    }

    /// Always [`ArtifactState::Reviewed`].
    pub fn state(&self) -> ArtifactState {
        ArtifactState::Reviewed
    }
}

impl<T: PartialEq> Reviewed<T> {
    /// True when the reviewer changed the draft.
    pub fn was_revised(&self) -> bool {
        self.original != self.revised
    }
}

/// Both reviewed artifacts of a complete run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct CompleteStory {
    /// Reviewed plan the story was written from
    plan: Reviewed<StoryPlan>,
    /// Reviewed story
    story: Reviewed<FullStory>,
}

impl CompleteStory {
    pub(crate) fn new(plan: Reviewed<StoryPlan>, story: Reviewed<FullStory>) -> Self {
        Self { plan, story }
    }
}
