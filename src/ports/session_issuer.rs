//! SessionIssuer port - Interface to the upstream session-issuing API.
//!
//! Implementations perform exactly one upstream call per invocation and
//! never retry. Failures come back as [`SessionError`] values rather than
//! panics, so the HTTP layer can always build a JSON response.

use async_trait::async_trait;

use crate::domain::session::{ClientSecret, SessionCredentials, SessionError};

/// Port for creating chat-widget sessions upstream.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Creates a new session for the anonymous user and the configured
    /// workflow, returning the client secret on success.
    async fn create_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<ClientSecret, SessionError>;
}
