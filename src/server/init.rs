//! Server initialization and main run loop

use super::config::AppConfig;
use super::loader::load_config;
use super::services::{build_orchestrator, open_database};
use super::validation::validate_config;
use crate::api::{api_router, AppState};
use crate::middleware::auth::AuthSettings;
use anyhow::{Context, Result};
use axum::{routing::get, Extension, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Assemble the HTTP application
pub fn build_app(state: AppState, auth: AuthSettings) -> Router {
    api_router(state)
        .route("/", get(|| async { "Colony agent hub" }))
        .layer(Extension(Arc::new(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the server
pub async fn run() -> Result<()> {
    info!("Starting Colony v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");
    validate_config(&config)?;

    serve(config).await
}

async fn serve(config: AppConfig) -> Result<()> {
    let db = open_database(&config).await?;
    let orchestrator = Arc::new(build_orchestrator(&config, db.clone()).await?);

    let auth = AuthSettings::new(config.server.api_token());
    if auth.api_token.is_none() {
        warn!("server.api_token is not set; identity headers are trusted as-is");
    }

    let app = build_app(AppState::new(orchestrator, db), auth);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Colony shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
