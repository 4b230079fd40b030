//! Conversion between Fabula and OpenAI chat-completions types.

use super::dto::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use fabula_core::{FinishReason, GenerateRequest, GenerateResponse, TokenUsage};
use fabula_error::{LlmError, LlmErrorKind};
use tracing::{debug, instrument};

/// Convert a [`GenerateRequest`] into a chat-completions body.
///
/// The request's own model wins over `default_model`.
#[instrument(skip(req), fields(messages = req.messages().len()))]
pub(crate) fn to_chat_request(req: &GenerateRequest, default_model: &str) -> ChatCompletionRequest {
    let messages = req
        .messages()
        .iter()
        .map(|m| ChatMessage::new(m.role().wire_name(), m.content().clone()))
        .collect();

    ChatCompletionRequest {
        model: req
            .model()
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
        messages,
        max_tokens: *req.max_tokens(),
        temperature: *req.temperature(),
    }
}

/// Convert a chat-completions body into a [`GenerateResponse`].
///
/// # Errors
///
/// - [`LlmErrorKind::MalformedResponse`] when there is no choice or the content is null
/// - [`LlmErrorKind::ContentFiltered`] when the provider withheld the output
#[instrument(skip(resp))]
pub(crate) fn from_chat_response(
    resp: ChatCompletionResponse,
) -> Result<GenerateResponse, LlmError> {
    let usage = resp
        .usage()
        .as_ref()
        .map(|u| TokenUsage::new(*u.prompt_tokens(), *u.completion_tokens()));

    let choice = resp.choices().first().ok_or_else(|| {
        LlmError::new(LlmErrorKind::MalformedResponse(
            "response contained no choices".to_string(),
        ))
    })?;

    let finish_reason = choice
        .finish_reason()
        .as_deref()
        .map(FinishReason::from_wire)
        .unwrap_or_default();

    if finish_reason == FinishReason::ContentFilter {
        return Err(LlmError::new(LlmErrorKind::ContentFiltered(
            "completion withheld by the provider's content filter".to_string(),
        )));
    }
    if let Some(refusal) = choice.message().refusal() {
        return Err(LlmError::new(LlmErrorKind::ContentFiltered(refusal.clone())));
    }

    let text = choice.message().content().clone().ok_or_else(|| {
        LlmError::new(LlmErrorKind::MalformedResponse(
            "completion has no content".to_string(),
        ))
    })?;
    debug!(chars = text.chars().count(), ?finish_reason, "Converted completion");

    let mut response = GenerateResponse::new(text).with_finish_reason(finish_reason);
    if let Some(usage) = usage {
        response = response.with_usage(usage);
    }
    Ok(response)
}

/// Sort a non-success HTTP status into an [`LlmErrorKind`].
///
/// `body` is the raw response body; its `error.message` is used when it
/// parses as an OpenAI error envelope.
///
/// # Examples
///
/// ```
/// use fabula_error::LlmErrorKind;
/// use fabula_models::classify_status;
///
/// let kind = classify_status(429, r#"{"error":{"message":"quota"}}"#, Some(7));
/// assert_eq!(
///     kind,
///     LlmErrorKind::RateLimit { message: "quota".into(), retry_after_secs: Some(7) }
/// );
/// assert!(matches!(classify_status(401, "", None), LlmErrorKind::InvalidCredential(_)));
/// ```
pub fn classify_status(status: u16, body: &str, retry_after: Option<u64>) -> LlmErrorKind {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .map(|b| b.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    let code = parsed
        .as_ref()
        .and_then(|b| b.error.code.as_ref())
        .and_then(|c| c.as_str().map(str::to_string));
    let error_type = parsed.as_ref().and_then(|b| b.error.kind.clone());

    match status {
        401 | 403 => LlmErrorKind::InvalidCredential(format!("HTTP {}: {}", status, message)),
        429 => LlmErrorKind::RateLimit {
            message,
            retry_after_secs: retry_after,
        },
        408 | 504 => LlmErrorKind::Timeout(format!("HTTP {}: {}", status, message)),
        400 if is_content_policy(code.as_deref()) || is_content_policy(error_type.as_deref()) => {
            LlmErrorKind::ContentFiltered(message)
        }
        _ => LlmErrorKind::Transport(format!("HTTP {}: {}", status, message)),
    }
}

fn is_content_policy(code: Option<&str>) -> bool {
    matches!(code, Some("content_filter" | "content_policy_violation"))
}
