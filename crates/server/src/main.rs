mod bootstrap;
mod builder;
mod catalog;
mod errors;
mod health;
mod quiz;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use ringforge_core::config::{AppConfig, LoadOptions};
use ringforge_db::DbPool;
use tokio::sync::Notify;

fn init_logging(config: &AppConfig) {
    use ringforge_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

/// Every route lives under the `/ring-builder` prefix.
fn app_router(db_pool: DbPool) -> Router {
    Router::new().nest(
        "/ring-builder",
        Router::new()
            .merge(catalog::router(db_pool.clone()))
            .merge(quiz::router())
            .merge(builder::router(db_pool.clone()))
            .merge(health::router(db_pool)),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    // Bootstrap (connect, migrate, seed) with the config we already loaded
    let app = bootstrap::bootstrap_with_config(config).await?;
    let shutdown_grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("could not bind `{address}`"))?;

    tracing::info!(
        event_name = "system.server.listening",
        correlation_id = "bootstrap",
        bind_address = %address,
        "ring builder API listening"
    );

    let shutdown = Arc::new(Notify::new());
    let notified = shutdown.clone();
    let server = axum::serve(listener, app_router(app.db_pool.clone()))
        .with_graceful_shutdown(async move { notified.notified().await });
    let server_task = tokio::spawn(async move { server.await });

    wait_for_shutdown().await;
    shutdown.notify_one();

    // In-flight requests get the configured grace period to drain.
    match tokio::time::timeout(shutdown_grace, server_task).await {
        Ok(Ok(Ok(()))) => {
            tracing::info!(
                event_name = "system.server.stopped",
                correlation_id = "shutdown",
                "ring builder API stopped"
            );
        }
        Ok(Ok(Err(error))) => {
            return Err(error).context("server terminated with an error");
        }
        Ok(Err(join_error)) => {
            return Err(join_error).context("server task failed");
        }
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                grace_secs = app.config.server.graceful_shutdown_secs,
                "open connections did not drain within the grace period"
            );
        }
    }

    app.db_pool.close().await;
    Ok(())
}

async fn wait_for_shutdown() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!(
                event_name = "system.server.shutdown_signal",
                correlation_id = "shutdown",
                "shutdown signal received"
            );
        }
        Err(error) => {
            tracing::error!(
                event_name = "system.server.signal_error",
                correlation_id = "shutdown",
                error = %error,
                "could not listen for the shutdown signal; stopping"
            );
        }
    }
}
