//! Client-side delimiter grouping
//!
//! Stores without a native delimiter mode can still present one folder level
//! per call: scan every key under the prefix (sorted) and fold keys that run
//! past the next delimiter into their common prefix. Unlike a native listing
//! this walks the whole subtree even when only a page of it is returned.

/// Where a key sits relative to a listed prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLevel<'a> {
    Object,
    CommonPrefix(&'a str),
}

/// Returns `None` when `key` is outside `prefix`.
pub fn classify_key<'a>(prefix: &str, delimiter: Option<&str>, key: &'a str) -> Option<KeyLevel<'a>> {
    let rest = key.strip_prefix(prefix)?;
    let delimiter = match delimiter {
        Some(d) if !d.is_empty() => d,
        _ => return Some(KeyLevel::Object),
    };
    match rest.find(delimiter) {
        Some(idx) => Some(KeyLevel::CommonPrefix(
            &key[..prefix.len() + idx + delimiter.len()],
        )),
        None => Some(KeyLevel::Object),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GroupedPage<'a> {
    pub objects: Vec<&'a str>,
    pub common_prefixes: Vec<String>,
    /// Last key or common prefix returned, set only when more entries follow.
    pub next_marker: Option<String>,
}

/// Group one page of `sorted_keys`.
///
/// Objects and common prefixes both count towards `max_keys`. Listing resumes
/// strictly after `after`, and when `after` was a common prefix every key
/// beneath it is skipped as well.
pub fn group_page<'a, I>(
    sorted_keys: I,
    prefix: &str,
    delimiter: Option<&str>,
    after: Option<&str>,
    max_keys: usize,
) -> GroupedPage<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut page = GroupedPage::default();
    let mut count = 0usize;
    let mut last_marker: Option<String> = None;

    let skipped_prefix = after.filter(|marker| {
        delimiter.is_some_and(|d| !d.is_empty() && marker.ends_with(d))
            && marker.len() > prefix.len()
    });

    for key in sorted_keys {
        if let Some(marker) = after {
            if key <= marker {
                continue;
            }
        }
        if let Some(skipped) = skipped_prefix {
            if key.starts_with(skipped) {
                continue;
            }
        }

        let level = match classify_key(prefix, delimiter, key) {
            Some(level) => level,
            None => continue,
        };

        if let KeyLevel::CommonPrefix(common) = level {
            if page.common_prefixes.last().map(String::as_str) == Some(common) {
                continue;
            }
        }

        if count == max_keys {
            page.next_marker = last_marker;
            return page;
        }
        count += 1;

        match level {
            KeyLevel::Object => {
                page.objects.push(key);
                last_marker = Some(key.to_string());
            }
            KeyLevel::CommonPrefix(common) => {
                page.common_prefixes.push(common.to_string());
                last_marker = Some(common.to_string());
            }
        }
    }

    page
}
