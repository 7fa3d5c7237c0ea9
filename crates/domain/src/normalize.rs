//! Raw entry to canonical item

use crate::model::{Feed, Item, RawEntry};
use crate::resolve::{resolve_author, resolve_item_image};
use crate::sanitize::sanitize;

impl Item {
    /// Build the canonical item for `entry`, attributed to `feed`
    pub fn new(feed: &Feed, entry: &RawEntry) -> Self {
        Self {
            title: sanitize(&entry.title),
            description: sanitize(&entry.description),
            link: entry.link.clone(),
            image: resolve_item_image(entry),
            author: resolve_author(feed),
        }
    }
}
