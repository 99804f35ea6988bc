//! HTTP adapters - the proxy's single public endpoint.

pub mod middleware;
pub mod session;

pub use session::{session_routes, SessionProxyState};

use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the complete application router with request tracing.
pub fn app_router(state: SessionProxyState) -> Router {
    session_routes(state).layer(TraceLayer::new_for_http())
}
