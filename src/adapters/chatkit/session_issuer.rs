//! ChatKit session issuer - reqwest implementation of [`SessionIssuer`].
//!
//! Sends one `POST {base_url}/chatkit/sessions` per session request:
//!
//! ```text
//! Authorization: Bearer <api key>
//! Content-Type: application/json
//! OpenAI-Beta: chatkit_beta=v1
//!
//! {"user": "anonymous", "workflow": {"id": "<workflow id>"}}
//! ```
//!
//! and expects `{"client_secret": ...}` back. The secret is relayed as-is. There is no retry: a slow
//! or failing upstream surfaces directly as a [`SessionError`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::session::{ClientSecret, SessionCredentials, SessionError, ANONYMOUS_USER};
use crate::ports::SessionIssuer;

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Beta marker header required by the sessions endpoint.
pub const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "chatkit_beta=v1");

/// Connection settings for the upstream API.
#[derive(Debug, Clone)]
pub struct ChatKitClientConfig {
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ChatKitClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ChatKitClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Upstream session API client.
pub struct ChatKitSessionIssuer {
    config: ChatKitClientConfig,
    client: Client,
}

impl ChatKitSessionIssuer {
    pub fn new(config: ChatKitClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Builds the sessions endpoint URL.
    fn sessions_url(&self) -> String {
        format!("{}/chatkit/sessions", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_request(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Response, SessionError> {
        let body = SessionRequestBody {
            user: ANONYMOUS_USER,
            workflow: WorkflowRef {
                id: credentials.workflow_id.as_str(),
            },
        };

        self.client
            .post(self.sessions_url())
            .header("Authorization", format!("Bearer {}", credentials.api_key()))
            .header("Content-Type", "application/json")
            .header(BETA_HEADER.0, BETA_HEADER.1)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SessionError::transport(format!(
                        "request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    SessionError::transport(format!("connection failed: {}", e))
                } else {
                    SessionError::transport(e.to_string())
                }
            })
    }

    /// Converts a non-success status into [`SessionError::UpstreamRejected`].
    async fn handle_response_status(&self, response: Response) -> Result<Response, SessionError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Best effort: a non-JSON error body is reported as `{}`
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or_else(|_| serde_json::json!({}));

        tracing::error!(status = status.as_u16(), body = %body, "ChatKit API error");

        Err(SessionError::upstream_rejected(status.as_u16(), body))
    }

    async fn parse_response(&self, response: Response) -> Result<ClientSecret, SessionError> {
        let response = self.handle_response_status(response).await?;

        let session: SessionResponseBody = response
            .json()
            .await
            .map_err(|e| SessionError::malformed(format!("failed to parse response: {}", e)))?;

        match session.client_secret {
            Some(secret) if !secret.is_null() => Ok(ClientSecret::new(secret)),
            _ => Err(SessionError::malformed("response has no client_secret")),
        }
    }
}

#[async_trait]
impl SessionIssuer for ChatKitSessionIssuer {
    async fn create_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<ClientSecret, SessionError> {
        let response = self.send_request(credentials).await?;
        self.parse_response(response).await
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct SessionRequestBody<'a> {
    user: &'a str,
    workflow: WorkflowRef<'a>,
}

#[derive(Debug, Serialize)]
struct WorkflowRef<'a> {
    id: &'a str,
}

#[derive(Deserialize)]
struct SessionResponseBody {
    #[serde(default)]
    client_secret: Option<serde_json::Value>,
}
