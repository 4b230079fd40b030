//! Input validation errors.

/// Reasons a request is rejected before reaching the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Theme is missing or blank
    #[display("Story theme is required")]
    EmptyTheme,
    /// Genre is missing or blank
    #[display("Story genre is required")]
    EmptyGenre,
    /// No creatures were selected
    #[display("At least one creature must be selected")]
    NoCreatures,
    /// A creature entry is blank
    #[display("Creature #{} has an empty name", _0)]
    BlankCreature(usize),
    /// Some other required text field is blank
    #[display("Field '{}' must not be empty", _0)]
    EmptyField(String),
    /// A builder was finished without a required value
    #[display("Incomplete request: {}", _0)]
    Incomplete(String),
    /// An input file could not be read
    #[display("Cannot read input file {}: {}", path, reason)]
    UnreadableInput {
        /// Path as given by the caller
        path: String,
        /// Underlying I/O failure
        reason: String,
    },
}

/// Validation error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific error condition
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
