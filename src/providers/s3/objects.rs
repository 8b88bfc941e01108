//! Object deletes (single, batch)

use super::S3Store;
use crate::providers::{StoreError, StoreResult, MAX_KEYS};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};

impl S3Store {
    pub(super) async fn delete_object(&self, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::backend("DeleteObject", DisplayErrorContext(e)))?;
        Ok(())
    }

    pub(super) async fn delete_objects(&self, keys: &[String], quiet: bool) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        if keys.len() > MAX_KEYS {
            return Err(StoreError::BatchTooLarge {
                size: keys.len(),
                limit: MAX_KEYS,
            });
        }

        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::backend("DeleteObjects", e))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(quiet)
            .build()
            .map_err(|e| StoreError::backend("DeleteObjects", e))?;

        let response = self
            .client
            .delete_objects()
            .bucket(&self.config.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StoreError::backend("DeleteObjects", DisplayErrorContext(e)))?;

        // Quiet mode still reports the keys that failed.
        let errors = response.errors();
        if let Some(first) = errors.first() {
            return Err(StoreError::PartialDelete {
                requested: keys.len(),
                failed: errors.len(),
                first_error: format!(
                    "{}: {}",
                    first.key().unwrap_or_default(),
                    first.message().or(first.code()).unwrap_or("unknown error")
                ),
            });
        }

        Ok(())
    }
}
