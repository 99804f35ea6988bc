//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port.
//!
//! ## Usage
//!
//! ```ignore
//! use chat_session_proxy::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitPolicy};
//!
//! let policy = RateLimitPolicy::default();
//! let limiter = InMemoryRateLimiter::new(policy.window_secs);
//! ```

mod config;
mod in_memory;

pub use config::RateLimitPolicy;
pub use in_memory::{Clock, InMemoryRateLimiter};
