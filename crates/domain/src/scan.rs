//! Feed scanning

use crate::filter::{TagSet, should_skip};
use crate::model::{Feed, RawEntry};

/// Entries of `feed` that pass the tag filter, in document order.
///
/// No deduplication happens here; that is left to the seen store.
pub fn find_items<'a>(feed: &'a Feed, wanted: &TagSet) -> Vec<&'a RawEntry> {
    feed.entries
        .iter()
        .filter(|entry| !should_skip(entry, wanted))
        .collect()
}
