//! HTTP API
//!
//! REST endpoints, all under `/api`:
//! - GET /files?folder= - List one folder level
//! - DELETE /files?objectName= - Delete a single object
//! - GET /folders - List top-level folders
//! - DELETE /folders?folderPath= - Delete everything under a folder
//! - POST /upload - Multipart upload (`file`, `folder`, `fileName`)
//!
//! Any other path is served from the static directory when it exists.

mod error;
mod files;
mod folders;
mod upload;

use crate::browser::BucketBrowser;
use crate::config::ServerConfig;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// API state
pub struct ApiState {
    pub browser: Arc<BucketBrowser>,
    /// Cancelled on shutdown; folder deletes stop before their next page.
    pub shutdown: CancellationToken,
}

/// Routes under `/api`, without static files or middleware.
pub fn router(browser: Arc<BucketBrowser>, max_upload_bytes: usize) -> Router {
    router_with_shutdown(browser, max_upload_bytes, CancellationToken::new())
}

pub fn router_with_shutdown(
    browser: Arc<BucketBrowser>,
    max_upload_bytes: usize,
    shutdown: CancellationToken,
) -> Router {
    let state = Arc::new(ApiState { browser, shutdown });

    let api = Router::new()
        .route("/files", get(files::list_files).delete(files::delete_file))
        .route(
            "/folders",
            get(folders::list_folders).delete(folders::delete_folder),
        )
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state);

    Router::new().nest("/api", api)
}

/// Serve the API until Ctrl-C
pub async fn serve(browser: Arc<BucketBrowser>, config: &ServerConfig) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    let mut app = router_with_shutdown(browser, config.max_upload_bytes, shutdown.clone());

    if config.static_dir.is_dir() {
        info!("serve: static files from {}", config.static_dir.display());
        app = app.fallback_service(ServeDir::new(&config.static_dir));
    }

    let app = app
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("serve: listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("serve: stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("serve: failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("serve: shutting down");
    shutdown.cancel();
}
