//! HTTP middleware and request guards.

mod rate_limit;

pub use rate_limit::{extract_client_ip, origin_host, SessionRateLimit, CLIENT_ID_HEADER};
