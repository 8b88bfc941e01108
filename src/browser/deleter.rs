//! Paginated prefix delete
//!
//! Lists a page of keys under the folder, deletes that page as one quiet
//! batch, then follows the continuation token. Memory stays at one page no
//! matter how large the folder is. Pages already deleted stay deleted when a
//! later call fails, so a retry simply removes whatever is left.

use super::normalize_prefix;
use super::types::DeletionReport;
use crate::error::{BrowserError, BrowserResult};
use crate::providers::{ListRequest, ObjectStore, StoreError, MAX_KEYS};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct PrefixBulkDeleter {
    store: Arc<dyn ObjectStore>,
    page_size: usize,
}

impl PrefixBulkDeleter {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            page_size: MAX_KEYS,
        }
    }

    /// Page size for both the list call and the batch delete.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_KEYS);
        self
    }

    pub async fn delete_by_prefix(&self, folder_path: &str) -> BrowserResult<DeletionReport> {
        self.delete_by_prefix_with_cancel(folder_path, &CancellationToken::new())
            .await
    }

    /// Same as [`delete_by_prefix`](Self::delete_by_prefix), checking `cancel`
    /// before each page.
    pub async fn delete_by_prefix_with_cancel(
        &self,
        folder_path: &str,
        cancel: &CancellationToken,
    ) -> BrowserResult<DeletionReport> {
        if folder_path.is_empty() {
            return Err(BrowserError::invalid_argument(
                "folderPath parameter is required",
            ));
        }
        let prefix = normalize_prefix(folder_path);

        let mut deleted_count = 0usize;
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if cancel.is_cancelled() {
                warn!(
                    "delete_by_prefix: {} cancelled after {} objects",
                    prefix, deleted_count
                );
                return Err(BrowserError::Cancelled);
            }

            let request = ListRequest::new(prefix.clone())
                .with_max_keys(self.page_size)
                .with_continuation_token(cursor.take());

            let page = self
                .store
                .list(&request)
                .await
                .map_err(|e| abort(&prefix, deleted_count, e))?;
            pages += 1;

            if !page.objects.is_empty() {
                let keys: Vec<String> = page.objects.into_iter().map(|obj| obj.key).collect();
                self.store
                    .delete_multiple(&keys, true)
                    .await
                    .map_err(|e| abort(&prefix, deleted_count, e))?;
                deleted_count += keys.len();
                debug!(
                    "delete_by_prefix: {} page {} removed {} (total {})",
                    prefix,
                    pages,
                    keys.len(),
                    deleted_count
                );
            }

            cursor = page.next_continuation_token;
            if cursor.is_none() {
                break;
            }
        }

        info!(
            "delete_by_prefix: {} removed {} objects in {} pages",
            prefix, deleted_count, pages
        );
        Ok(DeletionReport { deleted_count })
    }
}

/// The partial count is not part of the error; it only reaches the log.
fn abort(prefix: &str, deleted_count: usize, err: StoreError) -> BrowserError {
    warn!(
        "delete_by_prefix: {} aborted after {} objects: {}",
        prefix, deleted_count, err
    );
    BrowserError::StoreUnavailable(err)
}
