//! Chat Session Proxy - HTTP server binary
//!
//! Loads configuration from the environment, wires the upstream client,
//! optional rate limiter and CORS allow-list into the axum router, and
//! serves until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chat_session_proxy::adapters::http::{app_router, middleware::SessionRateLimit, SessionProxyState};
use chat_session_proxy::adapters::{ChatKitSessionIssuer, InMemoryRateLimiter};
use chat_session_proxy::application::CreateSessionHandler;
use chat_session_proxy::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let settings = config.chatkit.settings();
    if !settings.is_complete() {
        tracing::warn!("ChatKit API key or workflow id missing; session requests will fail");
    }
    if config.features.debug && config.is_production() {
        tracing::warn!("Debug error details are enabled in production");
    }

    let issuer = Arc::new(ChatKitSessionIssuer::new(config.chatkit.client_config())?);
    let create_handler = Arc::new(CreateSessionHandler::new(issuer, settings));

    let mut state = SessionProxyState::new(create_handler, config.cors.allow_list()?)
        .with_debug(config.features.debug);

    if config.rate_limit.enabled {
        let policy = config.rate_limit.policy();
        let limiter = Arc::new(InMemoryRateLimiter::new(policy.window_secs));
        tracing::info!(
            window_secs = policy.window_secs,
            origin_quota = policy.default_origin_quota,
            client_quota = policy.client_per_window,
            "Rate limiting enabled"
        );
        state = state.with_rate_limit(SessionRateLimit::new(limiter, policy));
    }

    let app = app_router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Chat session proxy listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
