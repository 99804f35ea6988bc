//! HTTP handler for the session endpoint.
//!
//! Every path through [`session_endpoint`] returns a response carrying the
//! CORS headers, so browsers can read error bodies instead of failing on a
//! blocked cross-origin response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::adapters::http::middleware::SessionRateLimit;
use crate::application::handlers::session::CreateSessionHandler;
use crate::domain::cors::{AllowList, CorsHeaders};
use crate::domain::session::SessionError;
use crate::ports::RateLimitDenied;

use super::dto::{ErrorResponse, RateLimitedResponse, SessionResponse};

/// Cache policy for responses carrying secrets or quota state.
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionProxyState {
    create_handler: Arc<CreateSessionHandler>,
    allow_list: Arc<AllowList>,
    rate_limit: Option<SessionRateLimit>,
    debug: bool,
}

impl SessionProxyState {
    pub fn new(create_handler: Arc<CreateSessionHandler>, allow_list: AllowList) -> Self {
        Self {
            create_handler,
            allow_list: Arc::new(allow_list),
            rate_limit: None,
            debug: false,
        }
    }

    /// Enables quota checks on session requests.
    pub fn with_rate_limit(mut self, rate_limit: SessionRateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Echo internal error detail to clients in 500 responses.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// `OPTIONS|POST *` - Issue a chat-widget session
pub async fn session_endpoint(
    State(state): State<SessionProxyState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    let origin = headers.get(header::ORIGIN).and_then(|h| h.to_str().ok());
    let cors = state.allow_list.headers_for(origin);

    if method == Method::OPTIONS {
        return with_cors(StatusCode::NO_CONTENT.into_response(), &cors);
    }

    if method != Method::POST {
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &ErrorResponse::method_not_allowed(),
            &cors,
        );
    }

    if let Some(rate_limit) = &state.rate_limit {
        if let Some(denied) = rate_limit.enforce(&headers, connect_info.as_ref()).await {
            return rate_limited_response(&denied, &cors);
        }
    }

    match state.create_handler.handle().await {
        Ok(secret) => {
            let mut response =
                json_response(StatusCode::OK, &SessionResponse::from(secret), &cors);
            set_header(&mut response, header::CACHE_CONTROL, NO_STORE);
            response
        }
        Err(e) => handle_session_error(e, state.debug, &cors),
    }
}

fn handle_session_error(error: SessionError, debug: bool, cors: &CorsHeaders) -> Response {
    tracing::error!(error = %error, "Error creating chat session");

    let details = debug.then(|| error.to_string());
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorResponse::internal(details),
        cors,
    )
}

fn rate_limited_response(denied: &RateLimitDenied, cors: &CorsHeaders) -> Response {
    let mut response = json_response(
        StatusCode::TOO_MANY_REQUESTS,
        &RateLimitedResponse::new(denied.scope),
        cors,
    );
    set_header(&mut response, header::CACHE_CONTROL, NO_STORE);
    set_header(
        &mut response,
        header::RETRY_AFTER,
        &denied.retry_after_secs.to_string(),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: &T, cors: &CorsHeaders) -> Response {
    with_cors((status, Json(body)).into_response(), cors)
}

fn with_cors(mut response: Response, cors: &CorsHeaders) -> Response {
    for (name, value) in cors.pairs() {
        set_header(&mut response, HeaderName::from_static(name), &value);
    }
    response
}

fn set_header(response: &mut Response, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            response.headers_mut().insert(name, value);
        }
        Err(_) => tracing::warn!(header = %name, "Skipping header with invalid value"),
    }
}
