//! CORS allow-list and origin resolution.
//!
//! The allow-list is an immutable value built once from configuration.
//! Resolving a request origin is a pure function of the origin and the list:
//! a request origin that starts with one of the entries is echoed back, any
//! other origin (or no origin at all) resolves to the first entry.

use thiserror::Error;

/// Origins the widget is served from when nothing else is configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "https://digitalhealthcrc.github.io",
    "https://github.io",
    "http://localhost:8000",
    "http://127.0.0.1:8000",
];

/// Methods advertised to browsers in preflight responses.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Request headers the widget is allowed to send.
pub const ALLOWED_HEADERS: &str = "Content-Type, X-Client-ID";

/// Preflight cache lifetime in seconds.
pub const MAX_AGE_SECS: u32 = 86_400;

/// Errors building an allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllowListError {
    #[error("allow-list must contain at least one origin")]
    Empty,

    #[error("allowed origin '{0}' must start with http:// or https://")]
    InvalidOrigin(String),
}

/// Fixed, ordered set of front-end origins.
///
/// The first entry doubles as the fallback `Access-Control-Allow-Origin`
/// value for requests whose origin is not listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    origins: Vec<String>,
}

/// Outcome of matching a request origin against the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginDecision {
    /// Whether the request origin matched an entry.
    pub allowed: bool,
    /// Value for the `Access-Control-Allow-Origin` header.
    pub allow_origin: String,
}

impl AllowList {
    /// Builds an allow-list, preserving the given order.
    pub fn new<I, S>(origins: I) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins: Vec<String> = origins.into_iter().map(Into::into).collect();

        if origins.is_empty() {
            return Err(AllowListError::Empty);
        }

        if let Some(bad) = origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(AllowListError::InvalidOrigin(bad.clone()));
        }

        Ok(Self { origins })
    }

    /// Entry used when the request origin is absent or not listed.
    pub fn fallback(&self) -> &str {
        &self.origins[0]
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Resolves the `Access-Control-Allow-Origin` value for a request.
    ///
    /// Matching is a case-sensitive prefix test against each entry.
    pub fn resolve(&self, origin: Option<&str>) -> OriginDecision {
        match origin {
            Some(origin) if self.origins.iter().any(|o| origin.starts_with(o.as_str())) => {
                OriginDecision {
                    allowed: true,
                    allow_origin: origin.to_string(),
                }
            }
            _ => OriginDecision {
                allowed: false,
                allow_origin: self.fallback().to_string(),
            },
        }
    }

    /// Builds the full CORS header set for a request origin.
    pub fn headers_for(&self, origin: Option<&str>) -> CorsHeaders {
        CorsHeaders::new(self.resolve(origin).allow_origin)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// CORS headers attached to every response the proxy produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsHeaders {
    pub allow_origin: String,
}

impl CorsHeaders {
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
        }
    }

    /// Header name/value pairs in the order they are written.
    pub fn pairs(&self) -> [(&'static str, String); 5] {
        [
            ("access-control-allow-origin", self.allow_origin.clone()),
            ("access-control-allow-methods", ALLOWED_METHODS.to_string()),
            ("access-control-allow-headers", ALLOWED_HEADERS.to_string()),
            ("access-control-max-age", MAX_AGE_SECS.to_string()),
            ("vary", "Origin".to_string()),
        ]
    }
}
