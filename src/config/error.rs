//! Configuration error types

use thiserror::Error;

use crate::domain::cors::AllowListError;

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
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid upstream timeout")]
    InvalidTimeout,

    #[error("Invalid upstream base URL")]
    InvalidBaseUrl,

    #[error("Invalid CORS allow-list: {0}")]
    InvalidAllowList(#[from] AllowListError),

    #[error("Rate limit window must be at least one second")]
    InvalidRateLimitWindow,
}
