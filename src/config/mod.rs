//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `STUDY_MATCH` prefix and
//! nested values use double underscores as separators. Every section has
//! defaults, so an empty environment yields a runnable configuration.
//!
//! # Example
//!
//! ```no_run
//! use study_match::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Recompute workers: {}", config.dispatcher.worker_count);
//! ```

mod dispatcher;
mod error;
mod matching;
mod profile;
mod quiz;
mod telemetry;

pub use dispatcher::DispatcherConfig;
pub use error::{ConfigError, ValidationError};
pub use matching::MatchingConfig;
pub use profile::ProfileConfig;
pub use quiz::QuizConfig;
pub use telemetry::{Environment, TelemetryConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Logging (filter directive, JSON output, environment)
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Recompute worker pool
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Profile write retry budget
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Score calibration and result limits
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Answer key location
    #[serde(default)]
    pub quiz: QuizConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STUDY_MATCH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STUDY_MATCH__DISPATCHER__WORKER_COUNT=8` -> `dispatcher.worker_count = 8`
    /// - `STUDY_MATCH__MATCHING__CEILING_VARIANCE=0.1` -> `matching.ceiling_variance = 0.1`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STUDY_MATCH")
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
    /// Returns `ValidationError` for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.telemetry.validate()?;
        self.dispatcher.validate()?;
        self.profile.validate()?;
        self.matching.validate()?;
        self.quiz.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.telemetry.is_production()
    }
}
