//! Connection settings for an OpenAI-compatible endpoint.

use derive_getters::Getters;
use std::fmt;
use std::time::Duration;

/// Default chat-completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4.1";
/// Environment variable holding the API key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Connection settings for [`OpenAiClient`](crate::OpenAiClient).
///
/// The API key is optional here on purpose: a missing key is reported as an
/// invalid-credential failure when a request is made.
///
/// # Examples
///
/// ```
/// use fabula_models::OpenAiConfig;
/// use std::time::Duration;
///
/// let config = OpenAiConfig::new("gpt-4.1-mini")
///     .with_base_url("http://localhost:8080/v1/")
///     .with_timeout(Duration::from_secs(30));
///
/// assert_eq!(config.base_url(), "http://localhost:8080/v1");
/// assert!(config.api_key().is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Getters)]
pub struct OpenAiConfig {
    /// Base URL, without the `/chat/completions` suffix
    base_url: String,
    /// Model used when a request does not name one
    model: String,
    /// Bearer token
    api_key: Option<String>,
    /// Name of the variable the key was read from, for error messages
    api_key_env: String,
    /// Per-request deadline
    timeout: Duration,
}

impl OpenAiConfig {
    /// Settings for `model` against the public OpenAI endpoint, with no key.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `OPENAI_API_KEY` (optional; absence surfaces at call time)
    /// - `OPENAI_BASE_URL` (default: `https://api.openai.com/v1`)
    /// - `OPENAI_MODEL` (default: `gpt-4.1`)
    pub fn from_env() -> Self {
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let mut config = Self::new(model).with_api_key_from_env(DEFAULT_API_KEY_ENV);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        config
    }

    /// Read the key from the named environment variable.
    ///
    /// A missing or blank variable leaves the key unset.
    pub fn with_api_key_from_env(mut self, var: impl Into<String>) -> Self {
        let var = var.into();
        self.api_key = std::env::var(&var)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self.api_key_env = var;
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL; a trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full chat-completions URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout", &self.timeout)
            .finish()
    }
}
