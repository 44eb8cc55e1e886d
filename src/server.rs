//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, pipeline startup, the Axum server lifecycle and
//! the ordered shutdown that drains both pipelines.

use crate::application::{AuditPublisher, DeletionAggregator};
use crate::config::Config;
use crate::domain::audit_observer::AuditObserver;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::audit::{FileAuditObserver, RemoteAuditObserver};
use crate::infrastructure::persistence::{InMemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link storage (PostgreSQL with migrations, or in-memory)
/// - Deletion aggregator and audit publisher
/// - Configured audit observers
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, finishes
/// in-flight requests, then drains both pipelines within
/// `SHUTDOWN_TIMEOUT`.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let link_repository = connect_storage(&config).await?;

    let deletions = Arc::new(DeletionAggregator::start(
        link_repository.clone(),
        config.deletion_config(),
    ));
    let audit = Arc::new(AuditPublisher::start(config.audit_config()));

    for observer in audit_observers(&config)? {
        audit.register(observer).await?;
    }

    let state = AppState::new(
        link_repository,
        deletions.clone(),
        audit.clone(),
        config.base_url.clone(),
    )
    .with_trusted_subnet(config.trusted_subnet()?);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    tracing::info!("HTTP server stopped, draining pipelines");

    let drained = tokio::time::timeout(config.shutdown_timeout(), async {
        tokio::join!(deletions.stop(), audit.stop());
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            timeout = ?config.shutdown_timeout(),
            "Shutdown timeout elapsed before pipelines drained"
        );
    } else {
        tracing::info!("Pipelines drained");
    }

    served?;
    Ok(())
}

async fn connect_storage(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let Some(ref database_url) = config.database_url else {
        tracing::info!("Using in-memory link storage");
        return Ok(Arc::new(InMemoryLinkRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
}

fn audit_observers(config: &Config) -> Result<Vec<Arc<dyn AuditObserver>>> {
    let mut observers: Vec<Arc<dyn AuditObserver>> = Vec::new();

    if let Some(ref path) = config.audit_file {
        observers.push(Arc::new(FileAuditObserver::new(path.clone())));
    }
    if let Some(ref url) = config.audit_url {
        let remote = RemoteAuditObserver::with_timeout(url.clone(), config.audit_url_timeout())
            .context("Failed to build audit HTTP client")?;
        observers.push(Arc::new(remote));
    }

    Ok(observers)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_audit_observers_follow_config() {
        let mut config = Config::default();
        let names = |config: &Config| -> Vec<String> {
            audit_observers(config)
                .unwrap()
                .iter()
                .map(|o| o.name().to_string())
                .collect()
        };

        assert_eq!(names(&config), vec!["file"]);

        config.audit_url = Some("http://collector.local/audit".to_string());
        assert_eq!(names(&config), vec!["file", "remote"]);

        config.audit_file = None;
        assert_eq!(names(&config), vec!["remote"]);

        config.audit_url = None;
        assert!(names(&config).is_empty());

        config.audit_file = Some(PathBuf::from("/tmp/audit.json"));
        assert_eq!(names(&config), vec!["file"]);
    }

    #[tokio::test]
    async fn test_memory_storage_without_database_url() {
        let config = Config::default();

        let repository = connect_storage(&config).await.unwrap();

        assert!(repository.health_check().await);
    }
}
