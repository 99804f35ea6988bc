//! Integration tests for the ChatKit upstream client.
//!
//! A loopback axum server stands in for the upstream sessions API so the
//! real reqwest client is exercised end to end: request shape, headers,
//! success parsing, and error translation.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};

use chat_session_proxy::adapters::{ChatKitClientConfig, ChatKitSessionIssuer};
use chat_session_proxy::domain::session::{ChatKitSettings, SessionError};
use chat_session_proxy::ports::SessionIssuer;

// =============================================================================
// Fake upstream
// =============================================================================

#[derive(Debug, Clone)]
struct RecordedRequest {
    authorization: Option<String>,
    beta: Option<String>,
    content_type: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeUpstream {
    status: StatusCode,
    reply: String,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn sessions(
    State(upstream): State<FakeUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    upstream.recorded.lock().unwrap().push(RecordedRequest {
        authorization: get("authorization"),
        beta: get("openai-beta"),
        content_type: get("content-type"),
        body,
    });
    (upstream.status, upstream.reply.clone())
}

/// Starts a fake upstream and returns its base URL and request log.
async fn spawn_upstream(
    status: StatusCode,
    reply: &str,
) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let upstream = FakeUpstream {
        status,
        reply: reply.to_string(),
        recorded: recorded.clone(),
    };
    let app = Router::new()
        .route("/v1/chatkit/sessions", post(sessions))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1", addr), recorded)
}

fn issuer(base_url: &str) -> ChatKitSessionIssuer {
    ChatKitSessionIssuer::new(
        ChatKitClientConfig::new()
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn credentials() -> chat_session_proxy::domain::session::SessionCredentials {
    ChatKitSettings::new("sk-test-secret", "wf_123")
        .credentials()
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn success_returns_client_secret() {
    let (base_url, _) = spawn_upstream(
        StatusCode::OK,
        r#"{"id": "cksess_1", "client_secret": "abc123", "expires_at": 0}"#,
    )
    .await;

    let secret = issuer(&base_url)
        .create_session(&credentials())
        .await
        .unwrap();

    assert_eq!(secret.as_str(), Some("abc123"));
}

#[tokio::test]
async fn structured_client_secret_is_relayed_unchanged() {
    let (base_url, _) = spawn_upstream(
        StatusCode::OK,
        r#"{"client_secret": {"value": "ek_1", "expires_at": 1700000000}}"#,
    )
    .await;

    let secret = issuer(&base_url)
        .create_session(&credentials())
        .await
        .unwrap();

    assert_eq!(
        secret.into_inner(),
        json!({"value": "ek_1", "expires_at": 1700000000})
    );
}

#[tokio::test]
async fn request_carries_credentials_beta_marker_and_body() {
    let (base_url, recorded) =
        spawn_upstream(StatusCode::OK, r#"{"client_secret": "abc123"}"#).await;

    issuer(&base_url)
        .create_session(&credentials())
        .await
        .unwrap();

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test-secret"));
    assert_eq!(request.beta.as_deref(), Some("chatkit_beta=v1"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        request.body,
        json!({"user": "anonymous", "workflow": {"id": "wf_123"}})
    );
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let (base_url, _) =
        spawn_upstream(StatusCode::UNAUTHORIZED, r#"{"error": "invalid_key"}"#).await;

    let err = issuer(&base_url)
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SessionError::upstream_rejected(401, json!({"error": "invalid_key"}))
    );
    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("invalid_key"));
}

#[tokio::test]
async fn non_json_error_body_becomes_empty_object() {
    let (base_url, _) = spawn_upstream(StatusCode::BAD_GATEWAY, "upstream exploded").await;

    let err = issuer(&base_url)
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert_eq!(err, SessionError::upstream_rejected(502, json!({})));
}

#[tokio::test]
async fn success_without_client_secret_is_malformed() {
    let (base_url, _) = spawn_upstream(StatusCode::OK, r#"{"id": "cksess_1"}"#).await;

    let err = issuer(&base_url)
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::MalformedResponse(_)));
}

#[tokio::test]
async fn null_client_secret_is_malformed() {
    let (base_url, _) = spawn_upstream(StatusCode::OK, r#"{"client_secret": null}"#).await;

    let err = issuer(&base_url)
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = issuer(&format!("http://{}/v1", addr))
        .create_session(&credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Transport(_)));
}
