//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS on every response
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, closing the database afterwards

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{Database, Store};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        &*self.store
    }
}

/// Build the application router over any backing store.
pub fn build_router(store: Arc<dyn Store>) -> Router {
    let api = Router::new()
        .merge(routes::users::router())
        .merge(routes::results::router())
        .merge(routes::specs::router());

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState::new(store)))
}

/// Run the HTTP server until a shutdown signal, then close the database.
///
/// # Example
///
/// ```ignore
/// let db = Database::connect("osbadmin", &password, "127.0.0.1:3306", "osb_db").await?;
/// run_server(db, ServerConfig::default()).await?;
/// ```
pub async fn run_server(db: Database, config: ServerConfig) -> Result<(), ServerError> {
    let db = Arc::new(db);
    let app = build_router(db.clone());

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(db) {
        Ok(db) => db.close().await,
        Err(_) => tracing::warn!("database handle still shared at shutdown, leaving it open"),
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
