//! API Server setup

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use moodlift_db::Datastore;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::JwtConfig;
use crate::routes::create_router;
use crate::state::{ApiConfig, AppState};

/// Create the API server
pub async fn create_server(
    config: ApiConfig,
    datastore: Arc<Datastore>,
) -> Result<(Router, SocketAddr), Box<dyn std::error::Error + Send + Sync>> {
    // Create app state
    let state = AppState::new(datastore, JwtConfig::from_env()).await?;

    // Create router
    let mut router = create_router(state);

    // Add middleware
    router = router.layer(TraceLayer::new_for_http());

    if config.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    // Parse address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    Ok((router, addr))
}

/// Run the API server until a shutdown signal arrives
pub async fn run_server(
    config: ApiConfig,
    datastore: Arc<Datastore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, datastore).await?;

    tracing::info!("MoodLift API server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Start server in background (for testing)
pub async fn start_background_server(
    config: ApiConfig,
    datastore: Arc<Datastore>,
) -> Result<SocketAddr, Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, datastore).await?;

    // Bind to get actual address (useful when port is 0)
    let listener = TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    // Spawn server in background
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
