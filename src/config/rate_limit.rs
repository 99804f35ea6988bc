//! Rate limit configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::rate_limiter::RateLimitPolicy;

/// Rate limiting for session requests (off by default)
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Window length in seconds
    #[serde(default = "default_window")]
    pub window_secs: u32,

    /// Requests per window for each origin host
    #[serde(default = "default_origin_quota")]
    pub default_origin_quota: u32,

    /// Requests per window for each client; 0 disables the client bucket
    #[serde(default)]
    pub client_per_window: u32,

    /// JSON object of per-origin-host overrides, e.g. `{"localhost:8000": 10}`
    pub origin_quotas_json: Option<String>,
}

impl RateLimitConfig {
    pub fn policy(&self) -> RateLimitPolicy {
        let origin_quotas = self
            .origin_quotas_json
            .as_deref()
            .map(|json| RateLimitPolicy::parse_origin_quotas(json, self.default_origin_quota))
            .unwrap_or_default();

        RateLimitPolicy {
            window_secs: self.window_secs,
            default_origin_quota: self.default_origin_quota,
            client_per_window: self.client_per_window,
            origin_quotas,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled && self.window_secs == 0 {
            return Err(ValidationError::InvalidRateLimitWindow);
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_secs: default_window(),
            default_origin_quota: default_origin_quota(),
            client_per_window: 0,
            origin_quotas_json: None,
        }
    }
}

fn default_window() -> u32 {
    60
}

fn default_origin_quota() -> u32 {
    120
}
