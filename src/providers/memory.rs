//! In-memory object store
//!
//! Behaves like a bucket with delimiter listing, continuation tokens and a
//! multi-delete batch limit. Keeps call counts and can be told to fail, which
//! is what the browser tests rely on. Also backs `STORE_MODE=memory`.

use super::delimiter::group_page;
use super::{
    encode_key_path, ListPage, ListRequest, ObjectStore, ObjectSummary, PutOutcome, StoreError,
    StoreResult, MAX_KEYS,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

const NEVER: usize = usize::MAX;

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    content_type: Option<String>,
    last_modified: DateTime<Utc>,
}

pub struct MemoryStore {
    base_url: String,
    latency: Duration,
    objects: RwLock<BTreeMap<String, StoredObject>>,
    max_batch: usize,
    list_calls: AtomicUsize,
    delete_batches: Mutex<Vec<usize>>,
    fail_list_after: AtomicUsize,
    fail_delete_after: AtomicUsize,
}

impl MemoryStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            base_url: format!("memory://{}", bucket),
            latency: Duration::ZERO,
            objects: RwLock::new(BTreeMap::new()),
            max_batch: MAX_KEYS,
            list_calls: AtomicUsize::new(0),
            delete_batches: Mutex::new(Vec::new()),
            fail_list_after: AtomicUsize::new(NEVER),
            fail_delete_after: AtomicUsize::new(NEVER),
        }
    }

    /// Delay every store call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        tokio::task::yield_now().await;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Store an object directly, without going through `put`.
    pub async fn insert(&self, key: &str, body: impl Into<Bytes>) {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body: body.into(),
                content_type: None,
                last_modified: Utc::now(),
            },
        );
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects.read().await.get(key)?.content_type.clone()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Size of every multi-delete request received so far, in order.
    pub async fn delete_batches(&self) -> Vec<usize> {
        self.delete_batches.lock().await.clone()
    }

    /// Let `calls` list requests through, then fail every later one.
    pub fn fail_list_after(&self, calls: usize) {
        self.fail_list_after.store(calls, Ordering::SeqCst);
    }

    /// Let `batches` multi-deletes through, then fail every later one.
    pub fn fail_delete_after(&self, batches: usize) {
        self.fail_delete_after.store(batches, Ordering::SeqCst);
    }

    pub fn clear_failures(&self) {
        self.fail_list_after.store(NEVER, Ordering::SeqCst);
        self.fail_delete_after.store(NEVER, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, request: &ListRequest) -> StoreResult<ListPage> {
        self.simulate_latency().await;
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.fail_list_after.load(Ordering::SeqCst) {
            return Err(StoreError::backend("ListObjects", "injected list failure"));
        }

        let objects = self.objects.read().await;
        let grouped = group_page(
            objects.keys().map(String::as_str),
            &request.prefix,
            request.delimiter.as_deref(),
            request.continuation_token.as_deref(),
            request.max_keys,
        );

        let summaries = grouped
            .objects
            .iter()
            .filter_map(|key| {
                let stored = objects.get(*key)?;
                Some(ObjectSummary {
                    key: key.to_string(),
                    size: stored.body.len() as u64,
                    last_modified: stored.last_modified,
                    url: None,
                })
            })
            .collect();

        Ok(ListPage {
            objects: summaries,
            common_prefixes: grouped.common_prefixes,
            next_continuation_token: grouped.next_marker,
        })
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<PutOutcome> {
        self.simulate_latency().await;
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.map(str::to_string),
                last_modified: Utc::now(),
            },
        );
        Ok(PutOutcome {
            url: self.object_url(key),
        })
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.simulate_latency().await;
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn delete_multiple(&self, keys: &[String], _quiet: bool) -> StoreResult<()> {
        self.simulate_latency().await;
        if keys.len() > self.max_batch {
            return Err(StoreError::BatchTooLarge {
                size: keys.len(),
                limit: self.max_batch,
            });
        }

        let mut batches = self.delete_batches.lock().await;
        if batches.len() >= self.fail_delete_after.load(Ordering::SeqCst) {
            return Err(StoreError::backend(
                "DeleteObjects",
                "injected delete failure",
            ));
        }
        batches.push(keys.len());
        drop(batches);

        let mut objects = self.objects.write().await;
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, encode_key_path(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(keys: &[&str]) -> MemoryStore {
        let store = MemoryStore::new("test-bucket");
        for key in keys {
            store.insert(key, Bytes::from_static(b"data")).await;
        }
        store
    }

    #[tokio::test]
    async fn delimiter_listing_returns_one_level() {
        let store = seeded(&["a.txt", "docs/b.txt", "docs/sub/c.txt"]).await;

        let page = store
            .list(&ListRequest::new("docs/").with_delimiter("/"))
            .await
            .unwrap();

        let keys: Vec<_> = page.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["docs/b.txt"]);
        assert_eq!(page.common_prefixes, vec!["docs/sub/"]);
        assert!(page.next_continuation_token.is_none());
        assert_eq!(page.objects[0].size, 4);
    }

    #[tokio::test]
    async fn continuation_tokens_walk_every_key_once() {
        let keys: Vec<String> = (0..25).map(|i| format!("p/{:03}", i)).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let store = seeded(&refs).await;

        let mut seen = Vec::new();
        let mut token = None;
        loop {
            let page = store
                .list(
                    &ListRequest::new("p/")
                        .with_max_keys(10)
                        .with_continuation_token(token),
                )
                .await
                .unwrap();
            seen.extend(page.objects.into_iter().map(|o| o.key));
            token = page.next_continuation_token;
            if token.is_none() {
                break;
            }
        }

        assert_eq!(seen, keys);
        assert_eq!(store.list_calls(), 3);
    }

    #[tokio::test]
    async fn oversized_batches_are_rejected() {
        let store = MemoryStore::new("test-bucket");
        let keys: Vec<String> = (0..=MAX_KEYS).map(|i| i.to_string()).collect();

        let err = store.delete_multiple(&keys, true).await.unwrap_err();
        assert!(matches!(err, StoreError::BatchTooLarge { size: 1001, .. }));
    }

    #[tokio::test]
    async fn injected_failures_apply_after_the_allowed_calls() {
        let store = seeded(&["a", "b"]).await;
        store.fail_delete_after(1);

        store.delete_multiple(&["a".to_string()], true).await.unwrap();
        assert!(store.delete_multiple(&["b".to_string()], true).await.is_err());
        assert_eq!(store.keys().await, vec!["b".to_string()]);

        store.clear_failures();
        store.delete_multiple(&["b".to_string()], true).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_of_missing_key_succeeds() {
        let store = MemoryStore::new("test-bucket");
        store.delete("nope.txt").await.unwrap();
    }

    #[tokio::test]
    async fn put_returns_encoded_url() {
        let store = MemoryStore::new("test-bucket");
        let outcome = store
            .put("uploads/my file.txt", Bytes::from_static(b"x"), Some("text/plain"))
            .await
            .unwrap();
        assert_eq!(outcome.url, "memory://test-bucket/uploads/my%20file.txt");
        assert_eq!(store.len().await, 1);
    }
}
