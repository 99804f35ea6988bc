//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the proxy core and the outside world. Adapters implement these ports.
//!
//! - `SessionIssuer` - Upstream session-issuing API
//! - `RateLimiter` - Fixed-window request quotas

mod rate_limiter;
mod session_issuer;

pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope, RateLimiter,
};
pub use session_issuer::SessionIssuer;
