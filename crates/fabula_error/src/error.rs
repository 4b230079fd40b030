//! Top-level error wrapper types.

use crate::{ConfigError, LlmError, LlmErrorKind, ParseError, TemplateError, ValidationError};

/// Every error family the engine can produce.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, ValidationError, ValidationErrorKind};
///
/// let err: FabulaError = ValidationError::new(ValidationErrorKind::NoCreatures).into();
/// assert!(format!("{}", err).contains("Validation Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// Request rejected before any model call
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Model backend failure
    #[from(LlmError)]
    Llm(LlmError),
    /// Model answer did not match the expected format
    #[from(ParseError)]
    Parse(ParseError),
    /// Prompt template error
    #[from(TemplateError)]
    Template(TemplateError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{ConfigError, FabulaResult};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }

    /// The backend failure tag, if this error came from the model backend.
    pub fn llm_kind(&self) -> Option<&LlmErrorKind> {
        match self.kind() {
            FabulaErrorKind::Llm(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// True when the backend rejected the call for exceeding its quota.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.llm_kind(), Some(LlmErrorKind::RateLimit { .. }))
    }

    /// A short message suitable for showing to an end user.
    ///
    /// Drops the source location that the `Display` impl carries.
    ///
    /// # Examples
    ///
    /// ```
    /// use fabula_error::{FabulaError, LlmError, LlmErrorKind};
    ///
    /// let err: FabulaError = LlmError::new(LlmErrorKind::InvalidCredential(
    ///     "OPENAI_API_KEY is not set".into(),
    /// ))
    /// .into();
    /// assert_eq!(err.user_message(), "Invalid credential: OPENAI_API_KEY is not set");
    /// ```
    pub fn user_message(&self) -> String {
        match self.kind() {
            FabulaErrorKind::Validation(e) => e.kind.to_string(),
            FabulaErrorKind::Llm(e) => e.kind.to_string(),
            FabulaErrorKind::Parse(e) => e.kind.to_string(),
            FabulaErrorKind::Template(e) => e.kind.to_string(),
            FabulaErrorKind::Config(e) => e.message.clone(),
        }
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
