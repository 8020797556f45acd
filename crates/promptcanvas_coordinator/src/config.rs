//! Coordinator configuration.

use derive_getters::Getters;
use promptcanvas_core::Position;
use promptcanvas_error::{ConfigError, ConfigErrorKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Host written into new LLM cards.
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Model written into new LLM cards.
pub const DEFAULT_MODEL: &str = "llama3";

/// Horizontal distance between a stack and a comparison made from it.
pub const DEFAULT_COMPARISON_OFFSET_X: f64 = 320.0;

/// Environment variable overriding [`CoordinatorConfig::default_host`].
pub const HOST_ENV: &str = "PROMPTCANVAS_DEFAULT_HOST";

/// Environment variable overriding [`CoordinatorConfig::default_model`].
pub const MODEL_ENV: &str = "PROMPTCANVAS_DEFAULT_MODEL";

/// Environment variable overriding [`CoordinatorConfig::default_prompt_text`].
pub const PROMPT_ENV: &str = "PROMPTCANVAS_DEFAULT_PROMPT";

/// Defaults applied when the coordinator creates stacks and cards.
///
/// # Examples
///
/// ```
/// use promptcanvas_coordinator::CoordinatorConfig;
///
/// let config: CoordinatorConfig = "default_model = \"mistral\"".parse().unwrap();
/// assert_eq!(config.default_model(), "mistral");
/// assert_eq!(config.default_host(), "http://localhost:11434");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Host for new LLM cards
    #[builder(default = "DEFAULT_HOST.to_string()")]
    default_host: String,
    /// Model for new LLM cards
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    default_model: String,
    /// Text for new prompt cards
    #[builder(default)]
    default_prompt_text: String,
    /// Where a comparison stack lands relative to its original
    #[builder(default = "Position::new(DEFAULT_COMPARISON_OFFSET_X, 0.0)")]
    comparison_offset: Position,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            default_host: DEFAULT_HOST.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            default_prompt_text: String::new(),
            comparison_offset: Position::new(DEFAULT_COMPARISON_OFFSET_X, 0.0),
        }
    }
}

impl CoordinatorConfig {
    /// Creates a builder seeded with the defaults.
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::default()
    }

    /// Loads configuration from a TOML file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(ConfigErrorKind::FileRead(e.to_string())))?;
        let config: Self = content.parse()?;
        debug!(?config, "Loaded coordinator config");
        Ok(config)
    }

    /// Defaults overridden by [`HOST_ENV`], [`MODEL_ENV`] and [`PROMPT_ENV`].
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var(HOST_ENV) {
            self.default_host = host;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            self.default_model = model;
        }
        if let Ok(prompt) = std::env::var(PROMPT_ENV) {
            self.default_prompt_text = prompt;
        }
        self
    }
}

impl std::str::FromStr for CoordinatorConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))
    }
}
