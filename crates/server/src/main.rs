//! Nadecast API server entry point.
//!
//! The request-serving process: accepts publish/edit requests, enqueues
//! jobs for the worker process and waits for their results. Runs alongside
//! exactly one `nadecast-worker` sharing the same Redis.

use std::net::SocketAddr;
use std::sync::Arc;

use fred::prelude::*;
use nadecast_api::{AppState, router as api_router};
use nadecast_common::Config;
use nadecast_queue::{RedisJobBroker, ResultCorrelator};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nadecast=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting nadecast API server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to Redis
    info!("Connecting to Redis...");
    let fred_config = fred::types::config::Config::from_url(&config.redis.url)
        .expect("Failed to parse Redis URL");
    let redis_client = fred::clients::Client::new(fred_config, None, None, None);
    redis_client.connect();
    redis_client
        .wait_for_connect()
        .await
        .expect("Failed to connect to Redis");
    let redis_client = Arc::new(redis_client);
    info!("Connected to Redis");

    // Job submission path
    let broker = Arc::new(RedisJobBroker::new(
        redis_client,
        config.redis.prefix.clone(),
    ));
    let correlator = ResultCorrelator::new(broker, config.worker.job_timeout());

    let app = api_router()
        .with_state(AppState::new(correlator))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!(addr = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
