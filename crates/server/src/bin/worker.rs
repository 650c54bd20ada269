//! Nadecast worker entry point.
//!
//! The single background worker process: dequeues publish jobs one at a
//! time and runs the two-session choreography against the channel. Exactly
//! one instance consumes a given queue; the concurrency guarantee of the
//! pipeline depends on it.

use std::sync::Arc;

use fred::prelude::*;
use nadecast_common::Config;
use nadecast_core::{ChannelLinks, PublishService};
use nadecast_queue::{CreatePostHandler, EditPostHandler, JobKind, RedisJobBroker, WorkerLoop};
use nadecast_telegram::{BotApiSession, RateLimitedChannel};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
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
                .unwrap_or_else(|_| "nadecast=debug".into()),
        )
        .init();

    info!("Starting nadecast worker...");

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

    // Two platform sessions: primary sends bundles, secondary edits captions.
    let primary = RateLimitedChannel::new(Arc::new(BotApiSession::new(
        &config.telegram.primary_token,
    )));
    let secondary = RateLimitedChannel::new(Arc::new(BotApiSession::new(
        &config.telegram.secondary_token,
    )));

    let publish_service = PublishService::new(
        primary,
        secondary,
        config.telegram.channel_id,
        config.worker.settle_delay(),
        ChannelLinks {
            bot_url: config.telegram.bot_url.clone(),
            channel_url: config.telegram.channel_url.clone(),
        },
    );

    let broker = Arc::new(RedisJobBroker::new(
        redis_client,
        config.redis.prefix.clone(),
    ));

    let worker = WorkerLoop::new(
        broker,
        config.worker.poll_interval(),
        config.worker.result_ttl(),
    )
    .with_handler(
        JobKind::CreatePost,
        Arc::new(CreatePostHandler::new(publish_service.clone())),
    )
    .with_handler(
        JobKind::EditPost,
        Arc::new(EditPostHandler::new(publish_service)),
    );

    // An in-flight job finishes or fails on its own; the loop is safe to
    // drop between jobs.
    tokio::select! {
        () = worker.run() => {},
        () = shutdown_signal() => {},
    }

    info!("Shutdown complete");
    Ok(())
}
