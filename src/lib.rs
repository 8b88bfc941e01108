//! Web file manager for an S3-compatible bucket
//!
//! Folders are simulated with `/`-delimited key prefixes. The browser lists one
//! level at a time and deletes folders by paging through their keys.
//!
//! ```text
//! HTTP API (axum)
//!     │
//!     ▼
//! BucketBrowser (timeouts, uploads, single deletes)
//!     ├── VirtualDirectoryLister
//!     └── PrefixBulkDeleter
//!     │
//!     ▼
//! ObjectStore (S3 client or in-memory)
//! ```

pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod providers;

pub use browser::{BucketBrowser, DeletionReport, Listing, ListingEntry};
pub use config::AppConfig;
pub use error::{BrowserError, BrowserResult};

use log::info;
use std::sync::Arc;

/// Load configuration from the environment and serve until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    let store = config.store.create_store();
    info!(
        "run: store ready (bucket={}, timeout={}s)",
        config.store.bucket(),
        config.operation_timeout.as_secs()
    );

    let browser = BucketBrowser::new(store)
        .with_operation_timeout(config.operation_timeout)
        .with_default_upload_folder(config.default_upload_folder.clone());

    api::serve(Arc::new(browser), &config.server).await
}
