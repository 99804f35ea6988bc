//! Rate limiting port for protecting the upstream quota.
//!
//! Uses a fixed-window counter algorithm. Windows are aligned to multiples
//! of the window length since the Unix epoch, so every key rolls over at
//! the same instant.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port for rate limiting operations.
///
/// Implementations should be thread-safe and support concurrent access.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if a request is allowed, consuming one unit of quota if so.
    async fn check(&self, key: &RateLimitKey, limit: u32)
        -> Result<RateLimitResult, RateLimitError>;
}

/// The scope at which a limit is applied.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitScope {
    /// All requests from one front-end origin.
    Origin,
    /// One browser (by client id) or one IP address within an origin.
    Client,
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::Origin => "origin",
            RateLimitScope::Client => "client",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key identifying one quota bucket.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub scope: RateLimitScope,
    pub identifier: String,
}

impl RateLimitKey {
    /// Bucket shared by every request from `origin_host`.
    pub fn origin(origin_host: &str) -> Self {
        Self {
            scope: RateLimitScope::Origin,
            identifier: format!("origin:{}", origin_host),
        }
    }

    /// Bucket for one browser, identified by its `X-Client-ID` header.
    pub fn client(origin_host: &str, client_id: &str) -> Self {
        Self {
            scope: RateLimitScope::Client,
            identifier: format!("client:{}:{}", origin_host, client_id),
        }
    }

    /// Bucket for one IP address when no client id is sent.
    pub fn ip(origin_host: &str, ip: &str) -> Self {
        Self {
            scope: RateLimitScope::Client,
            identifier: format!("ip:{}:{}", origin_host, ip),
        }
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed; `remaining` units are left in the window.
    Allowed { remaining: u32 },
    /// Request is denied.
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Details of a rate limit denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDenied {
    pub limit: u32,
    /// Seconds until the current window ends, at least 1.
    pub retry_after_secs: u32,
    pub scope: RateLimitScope,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Rate limiter backend is unavailable.
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}
