//! Author and image resolution
//!
//! Feed-level and entry-level images are resolved independently: an entry
//! without an image of its own never inherits the channel image.

use crate::model::{Author, Feed, RawEntry};

/// First candidate that is present and non-empty, or `""`
fn first_non_empty<'a, I>(candidates: I) -> &'a str
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// Derive the author every item of `feed` is attributed to
pub fn resolve_author(feed: &Feed) -> Author {
    let image = feed.image.as_ref();
    Author {
        title: first_non_empty([image.map(|i| i.title.as_str())]).to_string(),
        image: first_non_empty([image.map(|i| i.url.as_str())]).to_string(),
        link: feed.link.clone(),
    }
}

/// Pick the representative image URL for a single entry.
///
/// The entry's own image wins; otherwise the first enclosure with an `image/*`
/// MIME type is used.
pub fn resolve_item_image(entry: &RawEntry) -> String {
    let own = entry.image.as_ref().map(|i| i.url.as_str());
    let enclosures = entry
        .enclosures
        .iter()
        .filter(|e| {
            e.mime_type
                .as_deref()
                .is_some_and(|m| m.starts_with("image/"))
        })
        .map(|e| Some(e.url.as_str()));

    first_non_empty(std::iter::once(own).chain(enclosures)).to_string()
}
