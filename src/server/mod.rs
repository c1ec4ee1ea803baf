//! HTTP server: form page and download endpoint

pub mod page;
pub mod response;
pub mod routes;

use crate::downloader::workdir::sweep_stale;
use crate::extractor::Extractor;
use crate::utils::config::AppSettings;
use crate::utils::error::ServiceError;
use crate::utils::network::listening_urls;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub extractor: Arc<dyn Extractor>,
}

impl AppState {
    pub fn new(settings: AppSettings, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            settings: Arc::new(settings),
            extractor,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/download", post(routes::download))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C
pub async fn run(
    settings: AppSettings,
    extractor: Arc<dyn Extractor>,
) -> Result<(), ServiceError> {
    tokio::fs::create_dir_all(&settings.download_dir).await?;
    sweep_stale(&settings.download_dir).await;

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    let port = listener.local_addr()?.port();
    info!("Using extractor: {}", extractor.id());
    for url in listening_urls(port) {
        info!("Server running at {}", url);
    }

    let app = router(AppState::new(settings, extractor));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
