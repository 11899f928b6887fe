use axum::Router;
use axum_server::Server;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

pub mod auth;
pub mod config;

use auth::directory::MemoryDirectory;
use auth::provider::{GoogleAuthClient, GoogleClientConfig};
use auth::routes::{AuthState, create_auth_router};

/// Build the application router over the given state.
///
/// Split out from server startup so tests can serve the same router on an
/// ephemeral port.
pub fn build_router(state: Arc<AuthState>) -> Router {
    create_auth_router(state).layer(CorsLayer::permissive())
}

/// Build the shared auth state from configuration with a fresh in-memory
/// directory.
pub fn build_state(config: &config::Config) -> anyhow::Result<Arc<AuthState>> {
    let google = GoogleAuthClient::new(GoogleClientConfig::from(config))?;
    Ok(Arc::new(AuthState {
        google,
        directory: Arc::new(MemoryDirectory::default()),
    }))
}

/// Starts the web server with the given shutdown receiver.
pub async fn start_server(shutdown_rx: tokio::sync::oneshot::Receiver<()>) -> anyhow::Result<()> {
    start_server_with_config(config::Config::from_env(), shutdown_rx).await
}

/// Starts the web server with custom configuration
pub async fn start_server_with_config(
    config: config::Config,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let app = build_router(state);

    let addr: std::net::SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("listening on {}", addr);
    debug!(
        "Server configuration - host: {}, port: {}",
        config.host, config.port
    );

    let svc = app.into_make_service();
    let server = Server::bind(addr).serve(svc);

    tokio::select! {
        res = server => { res? },
        _ = &mut shutdown_rx => { /* graceful shutdown: stop accepting new connections */ }
    }

    Ok(())
}

pub async fn start_server_without_shutdown() -> anyhow::Result<()> {
    let (_tx, rx) = tokio::sync::oneshot::channel::<()>();
    start_server(rx).await
}
