//! HTTP server initialization and runtime setup.
//!
//! Handles the database connection, worker spawning, and Axum server lifecycle.

use crate::api::middleware::rate_limit::RateLimitSettings;
use crate::application::services::UrlService;
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::persistence::SqliteUrlStore;
use crate::infrastructure::persistence::database;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Background click worker
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, finishes
/// in-flight requests, closes the click queue and waits for the worker to
/// apply every accepted click.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = database::connect(&config.database_url, &config.pool_settings())
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    database::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let store = Arc::new(SqliteUrlStore::new(Arc::new(pool.clone())));

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        store.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let generator: Arc<dyn CodeGenerator> =
        Arc::new(RandomCodeGenerator::new(config.code_length));
    let url_service = UrlService::new(store, generator, click_tx, config.base_url.clone())
        .with_max_attempts(config.shorten_max_attempts);

    let state = AppState::new(Arc::new(url_service));

    let rate_limit = RateLimitSettings {
        burst: config.rate_limit_burst,
        replenish_ms: config.rate_limit_replenish_ms,
    };
    let app = app_router(state, rate_limit, config.behind_proxy)?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router held the last sender; the worker now drains and exits.
    tracing::info!("Server stopped, flushing click queue");
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Click worker terminated abnormally");
    }

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Resolves when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
