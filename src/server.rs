//! HTTP server initialization and runtime setup.
//!
//! Handles the database connection, worker spawning, and the Axum server
//! lifecycle including graceful shutdown.

use crate::application::services::VisitRecorder;
use crate::config::Config;
use crate::domain::repositories::MappingRepository;
use crate::domain::visit_stats::VisitStats;
use crate::domain::visit_worker::VisitWorkerPool;
use crate::infrastructure::persistence::PgMappingRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::token_generator::RandomTokenGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Upper bound on waiting for queued visits after the listener stops.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Background visit workers
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the listener stops accepting, in-flight requests
/// finish, queued visits are drained and the pool is closed.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = Arc::new(PgMappingRepository::new());
    repository
        .connect(&config.database_url, config.pool_options())
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    repository
        .migrate()
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    let repository: Arc<dyn MappingRepository> = repository;

    let stats = Arc::new(VisitStats::default());
    let (recorder, visit_rx) = VisitRecorder::channel(config.visit_queue_capacity, stats.clone());
    let workers = VisitWorkerPool::spawn(
        visit_rx,
        repository.clone(),
        stats,
        config.visit_workers,
    );
    tracing::info!(workers = workers.len(), "Visit workers started");

    let state = AppState::new(
        repository.clone(),
        Arc::new(RandomTokenGenerator),
        recorder,
        config.base_url.clone(),
        config.index_limit,
    );

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    // The router, and with it every recorder handle, is dropped by now, so the
    // workers exit once the queue is empty.
    tracing::info!("Draining visit queue");
    if tokio::time::timeout(DRAIN_TIMEOUT, workers.drain())
        .await
        .is_err()
    {
        tracing::warn!(
            timeout_secs = DRAIN_TIMEOUT.as_secs(),
            "Visit queue not drained in time, pending visits are lost"
        );
    }

    repository.close().await;

    served.context("Server error")?;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
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
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
