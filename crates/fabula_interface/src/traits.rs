//! Trait definitions for LLM backends.

use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::FabulaResult;
use std::sync::Arc;

/// Core trait that every LLM backend implements.
///
/// One call is one request/response round trip. Implementations report
/// backend failures as [`fabula_error::LlmError`] so callers can tell a
/// rate limit from a bad credential or a timeout.
#[async_trait]
pub trait FabulaDriver: Send + Sync {
    /// Generate a completion for the request.
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier used when a request does not name one.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<D: FabulaDriver + ?Sized> FabulaDriver for Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<D: FabulaDriver + ?Sized> FabulaDriver for Box<D> {
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
