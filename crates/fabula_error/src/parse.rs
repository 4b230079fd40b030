//! Errors for model answers that break the expected text contract.

/// Ways a successful completion can still be unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParseErrorKind {
    /// Review answer lacks one of its two section markers
    #[display("Review for {} is malformed: {}", artifact, reason)]
    MalformedReview {
        /// Reviewed artifact ("plan" or "story")
        artifact: String,
        /// What was wrong
        reason: String,
    },
    /// Numbered list has too few or too many items
    #[display(
        "Stage '{}' returned {} numbered items, expected {} to {}",
        stage,
        found,
        min,
        max
    )]
    ItemCount {
        /// Stage name
        stage: String,
        /// Smallest accepted count
        min: usize,
        /// Largest accepted count
        max: usize,
        /// Actual count
        found: usize,
    },
    /// A listed creature has no profile in the answer
    #[display("No character profile for '{}'", _0)]
    MissingProfile(String),
}

/// Parse error with source location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::MissingProfile("伊布".into()));
/// assert!(format!("{}", err).contains("伊布"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The specific error condition
    pub kind: ParseErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
