//! Virtual folders over a flat bucket
//!
//! - `types`: listing entries and operation reports
//! - `lister`: one folder level per call, folders first
//! - `deleter`: paginated prefix delete
//! - `service`: the facade handlers call, with timeouts

mod deleter;
mod lister;
mod service;
mod types;

pub use deleter::PrefixBulkDeleter;
pub use lister::VirtualDirectoryLister;
pub use service::{BucketBrowser, UploadReport, UploadRequest, DEFAULT_OPERATION_TIMEOUT};
pub use types::{locale_compare, DeletionReport, FileEntry, FolderEntry, Listing, ListingEntry};

use crate::providers::DELIMITER;

/// Append the delimiter to a non-empty path that lacks it, so `docs` never
/// matches `docs-2/...`. The empty path stays empty (bucket root).
pub fn normalize_prefix(path: &str) -> String {
    if path.is_empty() || path.ends_with(DELIMITER) {
        path.to_string()
    } else {
        format!("{}{}", path, DELIMITER)
    }
}
