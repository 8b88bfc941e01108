//! Object store providers
//!
//! - `s3`: any S3-compatible bucket (AWS, Aliyun OSS, R2, MinIO) via aws-sdk-s3
//! - `memory`: in-process store for local development and tests
//! - `delimiter`: client-side common-prefix grouping

pub mod delimiter;
pub mod memory;
pub mod s3;
mod s3_client;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

pub use s3_client::{build_endpoint_url, create_s3_client, S3ClientConfig};

/// Largest page a single list call may return, and the largest batch a
/// single multi-delete may carry.
pub const MAX_KEYS: usize = 1000;

pub const DELIMITER: &str = "/";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    #[error("batch of {size} keys exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("{failed} of {requested} keys could not be deleted: {first_error}")]
    PartialDelete {
        requested: usize,
        failed: usize,
        first_error: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Backend {
            operation,
            message: err.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    pub prefix: String,
    pub max_keys: usize,
    pub delimiter: Option<String>,
    pub continuation_token: Option<String>,
}

impl ListRequest {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            max_keys: MAX_KEYS,
            delimiter: None,
            continuation_token: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = Some(delimiter.to_string());
        self
    }

    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }

    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    /// Set only when the store hands back a ready-made access URL.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub objects: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
    pub next_continuation_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PutOutcome {
    pub url: String,
}

/// The subset of a bucket API the browser needs.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// One page of keys under `request.prefix`. With a delimiter, keys that
    /// continue past the next delimiter collapse into `common_prefixes`.
    async fn list(&self, request: &ListRequest) -> StoreResult<ListPage>;

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<PutOutcome>;

    /// Deleting a key that does not exist succeeds.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Delete up to [`MAX_KEYS`] keys in one request. In quiet mode the store
    /// only reports failures.
    async fn delete_multiple(&self, keys: &[String], quiet: bool) -> StoreResult<()>;

    /// Public URL for an object, used when a listing carries none.
    fn object_url(&self, key: &str) -> String;
}

/// Percent-encode each path segment of a key, keeping the `/` separators.
pub fn encode_key_path(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
