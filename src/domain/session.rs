//! Chat session types.
//!
//! A session request carries no user-provided data. Everything the upstream
//! call needs comes from server-side configuration, resolved into
//! [`SessionCredentials`] before any network work happens.

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// User identity sent upstream for every session.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Server-side settings for issuing sessions.
///
/// Either field may be absent; absence is only reported when a session is
/// actually requested.
#[derive(Debug, Clone, Default)]
pub struct ChatKitSettings {
    pub api_key: Option<Secret<String>>,
    pub workflow_id: Option<String>,
}

impl ChatKitSettings {
    pub fn new(api_key: impl Into<String>, workflow_id: impl Into<String>) -> Self {
        Self {
            api_key: Some(Secret::new(api_key.into())),
            workflow_id: Some(workflow_id.into()),
        }
    }

    /// Checks that both required values are present and non-empty.
    pub fn credentials(&self) -> Result<SessionCredentials, SessionError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().is_empty())
            .ok_or(SessionError::MissingConfiguration("API key"))?;

        let workflow_id = self
            .workflow_id
            .as_deref()
            .filter(|w| !w.is_empty())
            .ok_or(SessionError::MissingConfiguration("workflow id"))?;

        Ok(SessionCredentials {
            api_key: api_key.clone(),
            workflow_id: WorkflowId(workflow_id.to_string()),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.credentials().is_ok()
    }
}

/// Complete credentials for one upstream call.
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    api_key: Secret<String>,
    pub workflow_id: WorkflowId,
}

impl SessionCredentials {
    /// Exposes the API key for building the `Authorization` header.
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Upstream conversational flow to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(String);

impl WorkflowId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short-lived token the browser widget uses to talk to the upstream API.
///
/// Kept as raw JSON: the proxy relays whatever the upstream sends without
/// looking inside it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(serde_json::Value);

impl ClientSecret {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    /// The token as a string, when upstream sent one.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret([REDACTED])")
    }
}

/// Reasons a session could not be created.
///
/// Every variant maps to the same generic 500 response; the `Display`
/// output is only ever shown to clients in debug mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// A required configuration value is missing or empty.
    #[error("{0} not configured")]
    MissingConfiguration(&'static str),

    /// Upstream answered with a non-success status.
    #[error("ChatKit API returned {status}: {body}")]
    UpstreamRejected {
        status: u16,
        body: serde_json::Value,
    },

    /// The upstream call did not complete (connect failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream succeeded but the body was not usable.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl SessionError {
    pub fn upstream_rejected(status: u16, body: serde_json::Value) -> Self {
        SessionError::UpstreamRejected { status, body }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        SessionError::Transport(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        SessionError::MalformedResponse(message.into())
    }

    /// True when the failure happened before any upstream call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SessionError::MissingConfiguration(_))
    }
}
