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
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Recommendation cap '{0}' must be greater than zero")]
    ZeroCap(&'static str),

    #[error("Unknown step setting key: {0}")]
    UnknownStepKey(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Path must not be blank: {0}")]
    BlankPath(&'static str),
}
