//! Error types for the Fabula story engine.
//!
//! Every stage of the pipeline reports failures through the types in this crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The four families a caller usually cares about are:
//! - [`ValidationError`]: the request was rejected before any model call
//! - [`LlmError`]: the model backend failed (transport, quota, credentials...)
//! - [`ParseError`]: the model answered, but the answer breaks the expected format
//! - [`TemplateError`]: a prompt template could not be rendered
//!
//! # Examples
//!
//! ```
//! use fabula_error::{FabulaResult, LlmError, LlmErrorKind};
//!
//! fn call_model() -> FabulaResult<String> {
//!     Err(LlmError::new(LlmErrorKind::Timeout("no answer after 120s".into())))?
//! }
//!
//! let err = call_model().unwrap_err();
//! assert!(err.llm_kind().is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod llm;
mod parse;
mod template;
mod validation;

pub use config::ConfigError;
pub use error::{FabulaError, FabulaErrorKind, FabulaResult};
pub use llm::{LlmError, LlmErrorKind};
pub use parse::{ParseError, ParseErrorKind};
pub use template::{TemplateError, TemplateErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
