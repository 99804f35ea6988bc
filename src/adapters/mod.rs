//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the proxy core to external systems:
//! - `chatkit` - Upstream session API client (reqwest)
//! - `rate_limiter` - In-memory fixed-window limiter
//! - `http` - axum endpoint, DTOs, and request guards

pub mod chatkit;
pub mod http;
pub mod rate_limiter;

pub use chatkit::{ChatKitClientConfig, ChatKitSessionIssuer};
pub use rate_limiter::{InMemoryRateLimiter, RateLimitPolicy};
