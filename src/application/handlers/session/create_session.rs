//! CreateSessionHandler - Command handler for issuing chat-widget sessions.

use std::sync::Arc;

use crate::domain::session::{ChatKitSettings, ClientSecret, SessionError};
use crate::ports::SessionIssuer;

/// Handler for creating chat sessions.
///
/// Holds the server-side settings explicitly so tests can substitute them
/// without touching the process environment.
pub struct CreateSessionHandler {
    issuer: Arc<dyn SessionIssuer>,
    settings: ChatKitSettings,
}

impl CreateSessionHandler {
    pub fn new(issuer: Arc<dyn SessionIssuer>, settings: ChatKitSettings) -> Self {
        Self { issuer, settings }
    }

    pub async fn handle(&self) -> Result<ClientSecret, SessionError> {
        // 1. Fail closed before any network work
        let credentials = self.settings.credentials()?;

        // 2. Single upstream call, no retry
        let secret = self.issuer.create_session(&credentials).await?;

        tracing::debug!(workflow_id = %credentials.workflow_id, "Chat session created");

        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::SessionCredentials;
    use async_trait::async_trait;
    use secrecy::Secret;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockSessionIssuer {
        result: Result<ClientSecret, SessionError>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSessionIssuer {
        fn succeeding(token: &str) -> Self {
            Self {
                result: Ok(ClientSecret::new(token)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: SessionError) -> Self {
            Self {
                result: Err(error),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SessionIssuer for MockSessionIssuer {
        async fn create_session(
            &self,
            credentials: &SessionCredentials,
        ) -> Result<ClientSecret, SessionError> {
            self.calls
                .lock()
                .unwrap()
                .push(credentials.workflow_id.to_string());
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn returns_client_secret_from_issuer() {
        let issuer = Arc::new(MockSessionIssuer::succeeding("abc123"));
        let handler = CreateSessionHandler::new(
            issuer.clone(),
            ChatKitSettings::new("sk-test", "wf_123"),
        );

        let secret = handler.handle().await.unwrap();

        assert_eq!(secret.as_str(), Some("abc123"));
        assert_eq!(issuer.calls(), vec!["wf_123".to_string()]);
    }

    #[tokio::test]
    async fn missing_api_key_never_reaches_issuer() {
        let issuer = Arc::new(MockSessionIssuer::succeeding("abc123"));
        let settings = ChatKitSettings {
            api_key: None,
            workflow_id: Some("wf_123".to_string()),
        };
        let handler = CreateSessionHandler::new(issuer.clone(), settings);

        let err = handler.handle().await.unwrap_err();

        assert!(err.is_configuration());
        assert!(issuer.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_workflow_id_never_reaches_issuer() {
        let issuer = Arc::new(MockSessionIssuer::succeeding("abc123"));
        let settings = ChatKitSettings {
            api_key: Some(Secret::new("sk-test".to_string())),
            workflow_id: None,
        };
        let handler = CreateSessionHandler::new(issuer.clone(), settings);

        let err = handler.handle().await.unwrap_err();

        assert_eq!(err, SessionError::MissingConfiguration("workflow id"));
        assert!(issuer.calls().is_empty());
    }

    #[tokio::test]
    async fn upstream_rejection_is_propagated() {
        let rejection = SessionError::upstream_rejected(401, json!({"error": "invalid_key"}));
        let issuer = Arc::new(MockSessionIssuer::failing(rejection.clone()));
        let handler =
            CreateSessionHandler::new(issuer.clone(), ChatKitSettings::new("sk-test", "wf_123"));

        let err = handler.handle().await.unwrap_err();

        assert_eq!(err, rejection);
        assert_eq!(issuer.calls().len(), 1);
    }
}
