//! HTTP client for OpenAI-compatible chat completions.

use super::config::OpenAiConfig;
use super::conversion::{classify_status, from_chat_response, to_chat_request};
use super::dto::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use fabula_core::{GenerateRequest, GenerateResponse};
use fabula_error::{ConfigError, FabulaResult, LlmError, LlmErrorKind};
use fabula_interface::FabulaDriver;
use std::time::Instant;
use tracing::{debug, error, instrument, warn};

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Construction never checks the API key; a missing key fails the first
/// request with [`LlmErrorKind::InvalidCredential`]. Nothing is retried.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url(), model = %config.model()))]
    pub fn new(config: OpenAiConfig) -> FabulaResult<Self> {
        debug!("Creating OpenAI client");
        let client = reqwest::Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Send a chat completion request.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let api_key = self.config.api_key().as_deref().ok_or_else(|| {
            LlmError::new(LlmErrorKind::InvalidCredential(format!(
                "{} is not set",
                self.config.api_key_env()
            )))
        })?;

        let url = self.config.completions_url();
        debug!(url = %url, "Sending chat completion request");
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send chat completion request");
                if e.is_timeout() {
                    LlmError::new(LlmErrorKind::Timeout(format!(
                        "no answer after {}s",
                        self.config.timeout().as_secs()
                    )))
                } else {
                    LlmError::new(LlmErrorKind::Transport(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            let kind = classify_status(status.as_u16(), &body, retry_after);
            if kind.is_retryable() {
                warn!(status = %status, kind = kind.label(), "Chat completion failed");
            } else {
                error!(status = %status, body = %body, "Chat completion API returned error");
            }
            return Err(LlmError::new(kind));
        }

        let body = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read chat completion body");
            if e.is_timeout() {
                LlmError::new(LlmErrorKind::Timeout(e.to_string()))
            } else {
                LlmError::new(LlmErrorKind::Transport(e.to_string()))
            }
        })?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, "Failed to parse chat completion response");
            LlmError::new(LlmErrorKind::MalformedResponse(format!(
                "invalid JSON body: {}",
                e
            )))
        })?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_id = ?parsed.id(),
            "Received chat completion"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl FabulaDriver for OpenAiClient {
    #[instrument(skip(self, req), fields(prompt_chars = req.prompt_chars()))]
    async fn generate(&self, req: &GenerateRequest) -> FabulaResult<GenerateResponse> {
        let chat_request = to_chat_request(req, self.config.model());
        let chat_response = self.chat_completion(&chat_request).await?;
        let response = from_chat_response(chat_response)?;
        if let Some(usage) = response.usage() {
            debug!(
                prompt_tokens = usage.prompt_tokens(),
                completion_tokens = usage.completion_tokens(),
                "Token usage"
            );
        }
        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}
