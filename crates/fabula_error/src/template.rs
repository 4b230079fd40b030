//! Prompt template error types.

/// Specific error conditions for template loading and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TemplateErrorKind {
    /// Template file could not be read
    #[display("Failed to read template file: {}", _0)]
    FileRead(String),
    /// Template file is not valid TOML
    #[display("Failed to parse template TOML: {}", _0)]
    TomlParse(String),
    /// Stage name in the template file is not a known stage
    #[display("Unknown stage '{}'", _0)]
    UnknownStage(String),
    /// No template registered for a stage
    #[display("No template registered for stage '{}'", _0)]
    MissingTemplate(String),
    /// Template references a placeholder its stage does not declare
    #[display("Template for stage '{}' references unknown placeholder '{}'", stage, placeholder)]
    UnknownPlaceholder {
        /// Stage name
        stage: String,
        /// Offending placeholder
        placeholder: String,
    },
    /// Placeholder pattern failed to compile
    #[display("Invalid placeholder pattern: {}", _0)]
    InvalidPattern(String),
    /// A field the template needs was not supplied
    #[display("Stage '{}' is missing required field '{}'", stage, field)]
    MissingField {
        /// Stage name
        stage: String,
        /// Missing field name
        field: String,
    },
}

/// Error type for template operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{TemplateError, TemplateErrorKind};
///
/// let err = TemplateError::new(TemplateErrorKind::MissingField {
///     stage: "plan".into(),
///     field: "theme".into(),
/// });
/// assert!(format!("{}", err).contains("theme"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    /// The specific error condition
    pub kind: TemplateErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
