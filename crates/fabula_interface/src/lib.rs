//! Trait definitions for the Fabula story engine.
//!
//! The engine talks to language models only through [`FabulaDriver`], so
//! any backend (or a scripted stand-in for tests) can sit behind it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::FabulaDriver;
