//! Tag-based entry filtering

use std::collections::BTreeSet;

use crate::model::RawEntry;

/// The set of wanted tags. An empty set means "keep everything".
///
/// Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: BTreeSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// True if any of `categories` is a wanted tag
    pub fn matches_any<'a, I>(&self, categories: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        categories.into_iter().any(|c| self.contains(c))
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            tags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Decide whether `entry` should be skipped under `wanted`.
///
/// An entry is kept when `wanted` is empty or when at least one of its
/// categories is in `wanted`. Entries without categories are skipped whenever
/// `wanted` is non-empty.
pub fn should_skip(entry: &RawEntry, wanted: &TagSet) -> bool {
    if wanted.is_empty() {
        return false;
    }
    !wanted.matches_any(entry.categories.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{entry, sample_feed};

    #[test]
    fn test_should_skip_table() {
        let feed = sample_feed();
        let cases: [(usize, &[&str], bool); 6] = [
            (0, &["Test1", "Test2"], false),
            (0, &["Test1", "Test3"], false),
            (0, &["Test4", "Test3"], true),
            (1, &["Test1", "Test3"], false),
            (1, &["Test1", "Test2"], false),
            (1, &["Test4", "Test2"], true),
        ];

        for (index, tags, wanted) in cases {
            let tags: TagSet = tags.iter().copied().collect();
            assert_eq!(
                should_skip(&feed.entries[index], &tags),
                wanted,
                "entry {} with tags {:?}",
                index,
                tags
            );
        }
    }

    #[test]
    fn test_empty_tag_set_keeps_everything() {
        let feed = sample_feed();
        let untagged = entry("t", "https://example3.com/", "d", &[]);
        let empty = TagSet::new();

        assert!(!should_skip(&feed.entries[0], &empty));
        assert!(!should_skip(&feed.entries[1], &empty));
        assert!(!should_skip(&untagged, &empty));
    }

    #[test]
    fn test_untagged_entry_skipped_when_filtering() {
        let untagged = entry("t", "https://example3.com/", "d", &[]);
        let tags: TagSet = ["Test1"].into_iter().collect();
        assert!(should_skip(&untagged, &tags));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let feed = sample_feed();
        let tags: TagSet = ["test1", "TEST2"].into_iter().collect();
        assert!(should_skip(&feed.entries[0], &tags));
    }

    #[test]
    fn test_tag_set_collects_unique() {
        let tags: TagSet = vec!["b".to_string(), "a".to_string(), "b".to_string()]
            .into_iter()
            .collect();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
