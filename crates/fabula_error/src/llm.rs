//! Model backend failures.

/// Tagged failure reported by an LLM client.
///
/// Every variant is surfaced to the caller as-is. Nothing in the engine
/// retries; [`LlmErrorKind::is_retryable`] only tells a caller which
/// failures are worth trying again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LlmErrorKind {
    /// Connection, DNS, TLS or unexpected HTTP status
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// Backend quota exceeded
    #[display("Rate limited: {}", message)]
    RateLimit {
        /// Message returned by the backend
        message: String,
        /// Seconds to wait, from the `retry-after` header when present
        retry_after_secs: Option<u64>,
    },
    /// API key missing or rejected
    #[display("Invalid credential: {}", _0)]
    InvalidCredential(String),
    /// Backend refused to answer because of its content policy
    #[display("Content filtered: {}", _0)]
    ContentFiltered(String),
    /// Backend answered with something that is not a usable completion
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// No answer within the configured deadline
    #[display("Timed out: {}", _0)]
    Timeout(String),
}

impl LlmErrorKind {
    /// Check if this failure is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmErrorKind::Transport(_) | LlmErrorKind::RateLimit { .. } | LlmErrorKind::Timeout(_)
        )
    }

    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            LlmErrorKind::Transport(_) => "transport",
            LlmErrorKind::RateLimit { .. } => "rate_limit",
            LlmErrorKind::InvalidCredential(_) => "invalid_credential",
            LlmErrorKind::ContentFiltered(_) => "content_filtered",
            LlmErrorKind::MalformedResponse(_) => "malformed_response",
            LlmErrorKind::Timeout(_) => "timeout",
        }
    }
}

/// LLM error with source location tracking.
///
/// # Examples
///
/// ```
/// use fabula_error::{LlmError, LlmErrorKind};
///
/// let err = LlmError::new(LlmErrorKind::RateLimit {
///     message: "slow down".into(),
///     retry_after_secs: Some(20),
/// });
/// assert!(err.kind.is_retryable());
/// assert_eq!(err.kind.label(), "rate_limit");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("LLM Error: {} at line {} in {}", kind, line, file)]
pub struct LlmError {
    /// The kind of failure
    pub kind: LlmErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LlmError {
    /// Create a new LlmError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LlmErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
