//! Data transfer objects for the session endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::session::ClientSecret;
use crate::ports::RateLimitScope;

/// Generic message shown to clients on any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to create chat session. Please try again later.";

/// Successful session creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub client_secret: serde_json::Value,
}

impl From<ClientSecret> for SessionResponse {
    fn from(secret: ClientSecret) -> Self {
        Self {
            client_secret: secret.into_inner(),
        }
    }
}

/// Error envelope for 405 and 500 responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn method_not_allowed() -> Self {
        Self {
            error: "Method not allowed".to_string(),
            message: "Only POST requests are accepted".to_string(),
            details: None,
        }
    }

    pub fn internal(details: Option<String>) -> Self {
        Self {
            error: "Internal server error".to_string(),
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            details,
        }
    }
}

/// Body of a 429 response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitedResponse {
    pub error: String,
    pub message: String,
    pub scope: RateLimitScope,
}

impl RateLimitedResponse {
    pub fn new(scope: RateLimitScope) -> Self {
        Self {
            error: "Rate limit exceeded".to_string(),
            message: "Too many requests. Please try again later.".to_string(),
            scope,
        }
    }
}
