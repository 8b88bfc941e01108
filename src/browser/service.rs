//! Facade over the lister, the deleter and single-object calls

use super::types::{DeletionReport, Listing};
use super::{PrefixBulkDeleter, VirtualDirectoryLister};
use crate::error::{BrowserError, BrowserResult};
use crate::providers::{ObjectStore, DELIMITER};
use bytes::Bytes;
use log::info;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(120);

const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub folder: Option<String>,
    pub file_name: Option<String>,
    /// Name the client attached to the uploaded part
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub url: String,
    pub object_name: String,
    pub size: usize,
}

pub struct BucketBrowser {
    store: Arc<dyn ObjectStore>,
    lister: VirtualDirectoryLister,
    deleter: PrefixBulkDeleter,
    operation_timeout: Duration,
    default_upload_folder: String,
}

impl BucketBrowser {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            lister: VirtualDirectoryLister::new(store.clone()),
            deleter: PrefixBulkDeleter::new(store.clone()),
            store,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            default_upload_folder: DEFAULT_UPLOAD_FOLDER.to_string(),
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn with_default_upload_folder(mut self, folder: impl Into<String>) -> Self {
        self.default_upload_folder = folder.into();
        self
    }

    async fn timed<T, F>(&self, operation: F) -> BrowserResult<T>
    where
        F: Future<Output = BrowserResult<T>>,
    {
        tokio::time::timeout(self.operation_timeout, operation)
            .await
            .map_err(|_| BrowserError::TimedOut(self.operation_timeout))?
    }

    pub async fn list_folder(&self, folder: &str) -> BrowserResult<Listing> {
        self.timed(self.lister.list(folder)).await
    }

    /// Top-level folder prefixes of the bucket.
    pub async fn list_root_folders(&self) -> BrowserResult<Vec<String>> {
        let listing = self.timed(self.lister.list("")).await?;
        Ok(listing
            .folders()
            .map(|entry| entry.name().to_string())
            .collect())
    }

    /// Deleting a key that does not exist succeeds.
    pub async fn delete_file(&self, object_name: &str) -> BrowserResult<()> {
        if object_name.is_empty() {
            return Err(BrowserError::invalid_argument(
                "objectName parameter is required",
            ));
        }
        self.timed(async {
            self.store
                .delete(object_name)
                .await
                .map_err(BrowserError::from)
        })
        .await?;
        info!("delete_file: {}", object_name);
        Ok(())
    }

    pub async fn delete_folder(&self, folder_path: &str) -> BrowserResult<DeletionReport> {
        self.delete_folder_with_cancel(folder_path, &CancellationToken::new())
            .await
    }

    pub async fn delete_folder_with_cancel(
        &self,
        folder_path: &str,
        cancel: &CancellationToken,
    ) -> BrowserResult<DeletionReport> {
        self.timed(self.deleter.delete_by_prefix_with_cancel(folder_path, cancel))
            .await
    }

    /// Store the body under `folder/fileName`, falling back to the default
    /// upload folder and the part's original name.
    pub async fn upload(&self, request: UploadRequest) -> BrowserResult<UploadReport> {
        let object_name = self.object_name_for(&request)?;
        let UploadRequest {
            body, content_type, ..
        } = request;
        let size = body.len();

        let outcome = self
            .timed(async {
                self.store
                    .put(&object_name, body, content_type.as_deref())
                    .await
                    .map_err(BrowserError::from)
            })
            .await?;

        info!("upload: {} ({} bytes)", object_name, size);
        Ok(UploadReport {
            url: outcome.url,
            object_name,
            size,
        })
    }

    fn object_name_for(&self, request: &UploadRequest) -> BrowserResult<String> {
        let folder = non_empty(request.folder.as_deref())
            .unwrap_or(self.default_upload_folder.as_str());
        let file_name = non_empty(request.file_name.as_deref())
            .or_else(|| non_empty(request.original_name.as_deref()))
            .ok_or_else(|| BrowserError::invalid_argument("fileName is required"))?;

        let folder = folder.trim_end_matches(DELIMITER);
        if folder.is_empty() {
            Ok(file_name.to_string())
        } else {
            Ok(format!("{}{}{}", folder, DELIMITER, file_name))
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::memory::MemoryStore;

    fn browser_over(store: &Arc<MemoryStore>) -> BucketBrowser {
        BucketBrowser::new(store.clone())
    }

    fn upload(folder: Option<&str>, file_name: Option<&str>) -> UploadRequest {
        UploadRequest {
            folder: folder.map(str::to_string),
            file_name: file_name.map(str::to_string),
            original_name: Some("photo.jpg".to_string()),
            content_type: Some("image/jpeg".to_string()),
            body: Bytes::from_static(b"jpeg-bytes"),
        }
    }

    #[tokio::test]
    async fn upload_defaults_to_uploads_folder_and_original_name() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        let browser = browser_over(&store);

        let report = browser.upload(upload(None, None)).await.unwrap();

        assert_eq!(report.object_name, "uploads/photo.jpg");
        assert_eq!(report.size, 10);
        assert_eq!(report.url, "memory://test-bucket/uploads/photo.jpg");
        assert_eq!(
            store.content_type("uploads/photo.jpg").await.as_deref(),
            Some("image/jpeg")
        );
    }

    #[tokio::test]
    async fn upload_uses_given_folder_and_name_without_doubling_slash() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        let browser = browser_over(&store);

        let report = browser
            .upload(upload(Some("docs/"), Some("renamed.jpg")))
            .await
            .unwrap();

        assert_eq!(report.object_name, "docs/renamed.jpg");
        assert_eq!(store.keys().await, vec!["docs/renamed.jpg".to_string()]);
    }

    #[tokio::test]
    async fn upload_without_any_name_is_invalid() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        let browser = browser_over(&store);
        let mut request = upload(None, None);
        request.original_name = None;

        let err = browser.upload(request).await.unwrap_err();
        assert!(matches!(err, BrowserError::InvalidArgument(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn custom_default_folder_is_used() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        let browser = browser_over(&store).with_default_upload_folder("inbox");

        let report = browser.upload(upload(Some(""), None)).await.unwrap();
        assert_eq!(report.object_name, "inbox/photo.jpg");
    }

    #[tokio::test]
    async fn delete_file_is_idempotent() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        store.insert("a.txt", "x").await;
        let browser = browser_over(&store);

        browser.delete_file("a.txt").await.unwrap();
        browser.delete_file("a.txt").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_file_requires_a_name() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        let browser = browser_over(&store);

        let err = browser.delete_file("").await.unwrap_err();
        assert_eq!(err.to_string(), "objectName parameter is required");
    }

    #[tokio::test]
    async fn root_folders_are_prefix_names() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        for key in ["a.txt", "docs/b.txt", "images/c.png"] {
            store.insert(key, "x").await;
        }
        let browser = browser_over(&store);

        let folders = browser.list_root_folders().await.unwrap();
        assert_eq!(folders, vec!["docs/".to_string(), "images/".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_times_out() {
        let store = Arc::new(MemoryStore::new("test-bucket").with_latency(Duration::from_secs(5)));
        let browser = browser_over(&store).with_operation_timeout(Duration::from_secs(1));

        let err = browser.list_folder("").await.unwrap_err();
        assert!(matches!(err, BrowserError::TimedOut(_)));
    }

    #[tokio::test]
    async fn delete_folder_reports_count() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        for key in ["docs/a", "docs/b", "docs/sub/c"] {
            store.insert(key, "x").await;
        }
        let browser = browser_over(&store);

        let report = browser.delete_folder("docs").await.unwrap();
        assert_eq!(report.deleted_count, 3);
        assert!(browser.list_folder("docs").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_folder_delete_leaves_objects_in_place() {
        let store = Arc::new(MemoryStore::new("test-bucket"));
        for key in ["docs/a", "docs/b"] {
            store.insert(key, "x").await;
        }
        let browser = browser_over(&store);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = browser
            .delete_folder_with_cancel("docs", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, BrowserError::Cancelled));
        assert_eq!(store.len().await, 2);
    }
}
