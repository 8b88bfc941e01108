//! One folder level per call

use super::normalize_prefix;
use super::types::{FileEntry, FolderEntry, Listing, ListingEntry};
use crate::error::BrowserResult;
use crate::providers::{ListRequest, ObjectStore, DELIMITER, MAX_KEYS};
use log::debug;
use std::sync::Arc;

pub struct VirtualDirectoryLister {
    store: Arc<dyn ObjectStore>,
    page_size: usize,
}

impl VirtualDirectoryLister {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            page_size: MAX_KEYS,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_KEYS);
        self
    }

    /// Immediate children of `path_prefix`: its sub-folders, then its files.
    ///
    /// Reads a single page. When the store has more entries the listing is
    /// cut off and `truncated` is set.
    pub async fn list(&self, path_prefix: &str) -> BrowserResult<Listing> {
        let prefix = normalize_prefix(path_prefix);
        let request = ListRequest::new(prefix.clone())
            .with_delimiter(DELIMITER)
            .with_max_keys(self.page_size);

        let page = self.store.list(&request).await?;
        let truncated = page.next_continuation_token.is_some();

        let folders = page
            .common_prefixes
            .into_iter()
            .map(|prefix| ListingEntry::Folder(FolderEntry::new(prefix)));

        // Skip directory markers
        let files = page
            .objects
            .into_iter()
            .filter(|obj| !obj.key.ends_with(DELIMITER))
            .map(|obj| {
                let url = obj
                    .url
                    .unwrap_or_else(|| self.store.object_url(&obj.key));
                ListingEntry::File(FileEntry {
                    key: obj.key,
                    size: obj.size,
                    last_modified: obj.last_modified,
                    url,
                })
            });

        let mut entries: Vec<ListingEntry> = folders.chain(files).collect();
        entries.sort_by(|a, b| a.display_order(b));

        debug!(
            "list: prefix={:?} entries={} truncated={}",
            prefix,
            entries.len(),
            truncated
        );

        Ok(Listing {
            queried_prefix: prefix,
            entries,
            truncated,
        })
    }
}
