//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Dispatcher worker count must be between 1 and 64")]
    InvalidWorkerCount,

    #[error("Shutdown timeout must be between 1 and 600 seconds")]
    InvalidTimeout,

    #[error("Profile write retries must be between 1 and 10")]
    InvalidRetryBudget,

    #[error("Ceiling variance must be finite and positive")]
    InvalidCeiling,

    #[error("Match limits must be positive and default_limit <= max_limit")]
    InvalidLimit,
}
