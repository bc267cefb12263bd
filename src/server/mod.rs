//! HTTP API: Word to PDF conversion and PDF compression

mod error;
mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::sync::Semaphore;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::config::ServerConfig;

pub use error::ApiError;
pub use handlers::parse_bool;

/// Shared, read-only process state plus the conversion job limiter
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub jobs: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let jobs = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));
        Self {
            config: Arc::new(config),
            jobs,
        }
    }
}

/// Build the API router.
///
/// Request bodies are capped at `max_upload_bytes` both by axum's extractor
/// limit and at the transport layer; CORS allows every origin.
pub fn create_router(config: ServerConfig) -> Router {
    let limit = config.max_upload_bytes;
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/api", get(handlers::root_handler))
        .route("/api/", get(handlers::root_handler))
        .route("/api/convert/word-to-pdf", post(handlers::convert_handler))
        .route("/api/compress/pdf", post(handlers::compress_handler))
        .layer(DefaultBodyLimit::max(limit))
        .layer(RequestBodyLimitLayer::new(limit))
        .layer(cors)
        .with_state(AppState::new(config))
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.addr;
    log::info!(
        "Listening on {} (max upload {} bytes, {} concurrent jobs, default compression level {})",
        addr,
        config.max_upload_bytes,
        config.max_concurrent_jobs,
        config.default_compression_level.value()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutting down"),
        Err(e) => log::warn!("Could not listen for shutdown signal: {}", e),
    }
}
