//! ListObjectsV2 paging

use super::S3Store;
use crate::providers::{ListPage, ListRequest, ObjectSummary, StoreError, StoreResult, MAX_KEYS};
use aws_sdk_s3::error::DisplayErrorContext;
use chrono::{DateTime, Utc};

impl S3Store {
    pub(super) async fn list_page(&self, request: &ListRequest) -> StoreResult<ListPage> {
        let max_keys = request.max_keys.min(MAX_KEYS) as i32;

        let mut call = self
            .client
            .list_objects_v2()
            .bucket(&self.config.bucket)
            .max_keys(max_keys);

        if !request.prefix.is_empty() {
            call = call.prefix(&request.prefix);
        }
        if let Some(d) = &request.delimiter {
            call = call.delimiter(d);
        }
        if let Some(token) = &request.continuation_token {
            call = call.continuation_token(token);
        }

        let response = call
            .send()
            .await
            .map_err(|e| StoreError::backend("ListObjectsV2", DisplayErrorContext(e)))?;

        let objects = response
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?.to_string();
                Some(ObjectSummary {
                    key,
                    size: obj.size().unwrap_or(0).max(0) as u64,
                    last_modified: obj
                        .last_modified()
                        .and_then(|dt| DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos()))
                        .unwrap_or_default(),
                    url: None,
                })
            })
            .collect();

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|prefix| prefix.prefix().map(|s| s.to_string()))
            .collect();

        let next_continuation_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|s| s.to_string())
        } else {
            None
        };

        Ok(ListPage {
            objects,
            common_prefixes,
            next_continuation_token,
        })
    }
}
