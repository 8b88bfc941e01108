//! Simple PUT uploads

use super::S3Store;
use crate::providers::{StoreError, StoreResult};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

impl S3Store {
    pub(super) async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<String> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(body));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::backend("PutObject", DisplayErrorContext(e)))?;

        Ok(response.e_tag().unwrap_or_default().to_string())
    }
}
