//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ENGAGEMENT_JOURNEY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use engagement_journey::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Result cap: {}", config.recommendation.result_cap);
//! ```

mod ai;
mod catalog;
mod error;
mod logging;
mod recommendation;
mod storage;

pub use ai::{AiConfig, AiProvider};
pub use catalog::CatalogConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use recommendation::RecommendationConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

use crate::domain::steps::StepSettings;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// in-memory setup with the built-in catalog and the mock AI provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration (Anthropic or mock)
    #[serde(default)]
    pub ai: AiConfig,

    /// Recommendation caps
    #[serde(default)]
    pub recommendation: RecommendationConfig,

    /// Global backbone step visibility, keyed by step setting key
    #[serde(default)]
    pub steps: StepSettings,

    /// Journey store location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Use-case library location
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ENGAGEMENT_JOURNEY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ENGAGEMENT_JOURNEY__RECOMMENDATION__RESULT_CAP=20` -> `recommendation.result_cap = 20`
    /// - `ENGAGEMENT_JOURNEY__STEPS__KICKOFF=false` -> kickoff step hidden
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ENGAGEMENT_JOURNEY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for zero caps, unknown step keys, blank
    /// paths, unknown log levels, or a missing API key for the Anthropic provider.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.recommendation.validate()?;
        if let Some(key) = self.steps.unknown_keys().first() {
            return Err(ValidationError::UnknownStepKey((*key).to_string()));
        }
        self.storage.validate()?;
        self.catalog.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
