//! S3-compatible object store
//!
//! This module is organized into submodules:
//! - `types`: store configuration and URL synthesis
//! - `list`: ListObjectsV2 paging
//! - `objects`: single and batch deletes
//! - `upload`: simple PUT uploads

mod list;
mod objects;
mod types;
mod upload;

pub use types::S3StoreConfig;

use super::{
    create_s3_client, ListPage, ListRequest, ObjectStore, PutOutcome, S3ClientConfig, StoreResult,
};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use bytes::Bytes;
use log::debug;

/// One client for the lifetime of the process.
pub struct S3Store {
    client: Client,
    config: S3StoreConfig,
}

impl S3Store {
    pub fn new(config: S3StoreConfig) -> Self {
        let endpoint_url = config.endpoint_url();
        let client = create_s3_client(&S3ClientConfig {
            access_key_id: &config.access_key_id,
            secret_access_key: &config.secret_access_key,
            region: &config.region,
            endpoint_url: Some(&endpoint_url),
            force_path_style: config.force_path_style,
        });
        Self { client, config }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(&self, request: &ListRequest) -> StoreResult<ListPage> {
        self.list_page(request).await
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<PutOutcome> {
        let etag = self.put_object(key, body, content_type).await?;
        debug!("put_object: {} etag={}", key, etag);
        Ok(PutOutcome {
            url: self.config.object_url(key),
        })
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.delete_object(key).await
    }

    async fn delete_multiple(&self, keys: &[String], quiet: bool) -> StoreResult<()> {
        self.delete_objects(keys, quiet).await
    }

    fn object_url(&self, key: &str) -> String {
        self.config.object_url(key)
    }
}
