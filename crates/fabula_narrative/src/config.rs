//! Engine configuration.
//!
//! Settings are layered with the `config` crate, later sources winning:
//! - Bundled defaults (include_str! from fabula.toml)
//! - `~/.config/fabula/fabula.toml`
//! - `./fabula.toml`
//! - An explicit file passed by the caller

use crate::{Sampling, Stage};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use fabula_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../fabula.toml");

/// Per-stage sampling overrides. Unset fields keep the stage default.
///
/// ```toml
/// [stages.plan]
/// max_tokens = 2048
/// temperature = 0.9
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StageSettings {
    /// Completion length limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Everything the engine and its client read from configuration.
///
/// # Examples
///
/// ```
/// use fabula_narrative::{EngineConfig, Stage};
///
/// let config = EngineConfig::from_toml_str(
///     "strict_item_counts = true\n[stages.twists]\ntemperature = 0.9\n",
/// )
/// .unwrap();
///
/// assert!(*config.strict_item_counts());
/// let sampling = config.sampling(Stage::Twists);
/// assert_eq!(sampling.max_tokens, 768);
/// assert_eq!(sampling.temperature, 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct EngineConfig {
    /// Model identifier sent with every request
    model: String,
    /// Chat-completions base URL
    base_url: String,
    /// Environment variable holding the API key
    api_key_env: String,
    /// Per-request deadline in seconds
    timeout_secs: u64,
    /// Fail list stages whose item count is out of bounds
    #[serde(default)]
    strict_item_counts: bool,
    /// Upper limit for the style stage's computed token budget
    max_style_tokens: u32,
    /// Template override file
    #[serde(default)]
    templates: Option<PathBuf>,
    /// Creature roster override file
    #[serde(default)]
    roster: Option<PathBuf>,
    /// Sampling overrides keyed by stage name
    #[serde(default)]
    stages: HashMap<String, StageSettings>,
}

impl EngineConfig {
    /// Load configuration from the bundled defaults and the user's files.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a file is malformed or names an
    /// unknown stage.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Like [`EngineConfig::load`], with `explicit` layered on top.
    ///
    /// Unlike the user files, an explicit file must exist.
    #[instrument(skip(explicit), fields(explicit = ?explicit))]
    pub fn load_with(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fabula/fabula.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("fabula").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        Self::finish(builder)
    }

    /// Bundled defaults overridden by a single file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::defaults().add_source(File::from(path.as_ref()).required(true));
        Self::finish(builder)
    }

    /// Bundled defaults overridden by TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults().add_source(File::from_str(text, FileFormat::Toml));
        Self::finish(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        debug!(model = %config.model, overrides = config.stages.len(), "Configuration loaded");
        Ok(config)
    }

    /// Check values the type system cannot.
    ///
    /// # Errors
    ///
    /// Unknown stage names, temperatures outside `0.0..=2.0`, zero token
    /// limits and a blank model name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::new("model must not be empty"));
        }
        if self.max_style_tokens == 0 {
            return Err(ConfigError::new("max_style_tokens must be positive"));
        }
        for (name, settings) in &self.stages {
            Stage::from_str(name)
                .map_err(|_| ConfigError::new(format!("Unknown stage in [stages]: {}", name)))?;
            if let Some(temperature) = settings.temperature {
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(ConfigError::new(format!(
                        "stages.{}.temperature must be within 0.0..=2.0, got {}",
                        name, temperature
                    )));
                }
            }
            if settings.max_tokens == Some(0) {
                return Err(ConfigError::new(format!(
                    "stages.{}.max_tokens must be positive",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Stage defaults with any configured overrides applied.
    pub fn sampling(&self, stage: Stage) -> Sampling {
        let mut sampling = stage.default_sampling();
        if let Some(settings) = self.stages.get(stage.as_ref()) {
            if let Some(max_tokens) = settings.max_tokens {
                sampling.max_tokens = max_tokens;
            }
            if let Some(temperature) = settings.temperature {
                sampling.temperature = temperature;
            }
        }
        sampling
    }

    /// Request deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Use a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Switch strict item-count checking on or off.
    pub fn with_strict_item_counts(mut self, strict: bool) -> Self {
        self.strict_item_counts = strict;
        self
    }

    /// Override one stage's sampling.
    pub fn with_stage(mut self, stage: Stage, settings: StageSettings) -> Self {
        self.stages.insert(stage.to_string(), settings);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
            strict_item_counts: false,
            max_style_tokens: 8192,
            templates: None,
            roster: None,
            stages: HashMap::new(),
        }
    }
}
