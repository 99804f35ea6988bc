//! Upstream ChatKit configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::chatkit::{ChatKitClientConfig, DEFAULT_BASE_URL};
use crate::domain::session::ChatKitSettings;

/// ChatKit session API configuration
///
/// The API key and workflow id are optional here: a deployment missing
/// either still starts, and every session request fails closed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatKitConfig {
    /// Upstream API key (never sent to clients)
    pub api_key: Option<Secret<String>>,

    /// Workflow to start for each session
    pub workflow_id: Option<String>,

    /// Upstream API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ChatKitConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Secrets handed to the session handler
    pub fn settings(&self) -> ChatKitSettings {
        ChatKitSettings {
            api_key: self.api_key.clone(),
            workflow_id: self.workflow_id.clone(),
        }
    }

    /// Connection settings for the upstream client
    pub fn client_config(&self) -> ChatKitClientConfig {
        ChatKitClientConfig::new()
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout())
    }

    /// Validate ChatKit configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        Ok(())
    }
}

impl Default for ChatKitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            workflow_id: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}
