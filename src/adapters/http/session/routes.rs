//! HTTP routes for the session endpoint.

use axum::{routing::any, Router};

use super::handlers::{session_endpoint, SessionProxyState};

/// Creates the session router.
///
/// The endpoint answers on `/` and, through the fallback, on every other
/// path.
pub fn session_routes(state: SessionProxyState) -> Router {
    Router::new()
        .route("/", any(session_endpoint))
        .fallback(session_endpoint)
        .with_state(state)
}
