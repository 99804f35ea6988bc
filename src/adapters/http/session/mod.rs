//! HTTP adapter for the session endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, RateLimitedResponse, SessionResponse, INTERNAL_ERROR_MESSAGE};
pub use handlers::{session_endpoint, SessionProxyState, NO_STORE};
pub use routes::session_routes;
