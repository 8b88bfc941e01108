//! Listing entries and operation reports

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(rename = "name")]
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub url: String,
}

/// A common prefix. Never an object of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    #[serde(rename = "name")]
    pub prefix: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl FolderEntry {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            size: 0,
            last_modified: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListingEntry {
    Folder(FolderEntry),
    File(FileEntry),
}

impl ListingEntry {
    pub fn name(&self) -> &str {
        match self {
            ListingEntry::Folder(folder) => &folder.prefix,
            ListingEntry::File(file) => &file.key,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ListingEntry::Folder(_))
    }

    /// Folders before files, then by name.
    pub fn display_order(&self, other: &Self) -> Ordering {
        other
            .is_folder()
            .cmp(&self.is_folder())
            .then_with(|| locale_compare(self.name(), other.name()))
    }
}

/// Case-insensitive comparison; on a tie lower case sorts first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub queried_prefix: String,
    pub entries: Vec<ListingEntry>,
    /// The store held more entries than one page returned.
    pub truncated: bool,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn folders(&self) -> impl Iterator<Item = &ListingEntry> {
        self.entries.iter().filter(|e| e.is_folder())
    }

    pub fn files(&self) -> impl Iterator<Item = &ListingEntry> {
        self.entries.iter().filter(|e| !e.is_folder())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub deleted_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(key: &str) -> ListingEntry {
        ListingEntry::File(FileEntry {
            key: key.to_string(),
            size: 1,
            last_modified: DateTime::<Utc>::default(),
            url: format!("https://bucket.example.com/{}", key),
        })
    }

    #[test]
    fn folders_sort_before_files() {
        let mut entries = vec![
            file("a.txt"),
            ListingEntry::Folder(FolderEntry::new("z/")),
            file("B.txt"),
            ListingEntry::Folder(FolderEntry::new("b/")),
        ];
        entries.sort_by(|a, b| a.display_order(b));

        let names: Vec<_> = entries.iter().map(ListingEntry::name).collect();
        assert_eq!(names, vec!["b/", "z/", "a.txt", "B.txt"]);
    }

    #[test]
    fn locale_compare_ignores_case_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn entries_serialize_with_type_tag() {
        let folder = serde_json::to_value(ListingEntry::Folder(FolderEntry::new("docs/"))).unwrap();
        assert_eq!(
            folder,
            serde_json::json!({"type": "folder", "name": "docs/", "size": 0, "lastModified": null})
        );

        let file = serde_json::to_value(file("a.txt")).unwrap();
        assert_eq!(file["type"], "file");
        assert_eq!(file["name"], "a.txt");
        assert_eq!(file["url"], "https://bucket.example.com/a.txt");
        assert!(file["lastModified"].is_string());
    }
}
