//! Rate limit enforcement for session requests.
//!
//! Checks run in order, stopping at the first denial:
//! 1. Origin bucket (all browsers on one front-end host)
//! 2. Client bucket (one browser by `X-Client-ID`, or one IP), when enabled
//!
//! A limiter backend error fails open: the request proceeds and a warning
//! is logged.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use url::Url;

use crate::adapters::rate_limiter::RateLimitPolicy;
use crate::ports::{RateLimitDenied, RateLimitKey, RateLimitResult, RateLimiter};

/// Header carrying the per-browser identifier generated by the widget.
pub const CLIENT_ID_HEADER: &str = "X-Client-ID";

/// Placeholder used when an origin host or client IP cannot be determined.
const UNKNOWN: &str = "unknown";

/// Limiter plus the policy deciding which limits apply.
#[derive(Clone)]
pub struct SessionRateLimit {
    limiter: Arc<dyn RateLimiter>,
    policy: Arc<RateLimitPolicy>,
}

impl SessionRateLimit {
    pub fn new(limiter: Arc<dyn RateLimiter>, policy: RateLimitPolicy) -> Self {
        Self {
            limiter,
            policy: Arc::new(policy),
        }
    }

    /// Consumes quota for one request, returning the denial if any bucket
    /// is exhausted.
    pub async fn enforce(
        &self,
        headers: &HeaderMap,
        connect_info: Option<&ConnectInfo<SocketAddr>>,
    ) -> Option<RateLimitDenied> {
        let origin = headers
            .get(axum::http::header::ORIGIN)
            .and_then(|h| h.to_str().ok());
        let host = origin_host(origin);

        let origin_key = RateLimitKey::origin(&host);
        let origin_limit = self.policy.origin_limit(&host);
        if let Some(denied) = self.check(&origin_key, origin_limit).await {
            return Some(denied);
        }

        let client_limit = self.policy.client_limit()?;
        let client_key = match headers
            .get(CLIENT_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|id| !id.is_empty())
        {
            Some(client_id) => RateLimitKey::client(&host, client_id),
            None => {
                let ip = extract_client_ip(headers, connect_info)
                    .unwrap_or_else(|| UNKNOWN.to_string());
                RateLimitKey::ip(&host, &ip)
            }
        };

        self.check(&client_key, client_limit).await
    }

    async fn check(&self, key: &RateLimitKey, limit: u32) -> Option<RateLimitDenied> {
        match self.limiter.check(key, limit).await {
            Ok(RateLimitResult::Denied(denied)) => {
                tracing::info!(
                    scope = %denied.scope,
                    key = %key.identifier,
                    limit = denied.limit,
                    retry_after = denied.retry_after_secs,
                    "Rate limit exceeded"
                );
                Some(denied)
            }
            Ok(RateLimitResult::Allowed { remaining }) => {
                tracing::trace!(key = %key.identifier, remaining, "Rate limit check passed");
                None
            }
            Err(e) => {
                tracing::warn!("Rate limiter unavailable: {}", e);
                None
            }
        }
    }
}

/// Host (with non-default port) of an `Origin` header value.
pub fn origin_host(origin: Option<&str>) -> String {
    origin
        .and_then(|o| Url::parse(o).ok())
        .and_then(|url| {
            let host = url.host_str()?.to_string();
            Some(match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host,
            })
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Extract client IP from request headers, falling back to the socket.
///
/// Order of precedence:
/// 1. CF-Connecting-IP header
/// 2. X-Forwarded-For header (first IP in list)
/// 3. X-Real-IP header
/// 4. ConnectInfo socket address
pub fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<String> {
    if let Some(ip) = headers
        .get("CF-Connecting-IP")
        .and_then(|h| h.to_str().ok())
    {
        return Some(ip.trim().to_string());
    }

    if let Some(forwarded) = headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(first_ip) = forwarded.split(',').next() {
            return Some(first_ip.trim().to_string());
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP").and_then(|h| h.to_str().ok()) {
        return Some(real_ip.trim().to_string());
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}
