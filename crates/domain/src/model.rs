//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// A parsed syndication document (RSS or Atom)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    /// Base URL of the site the feed describes
    pub link: String,
    /// Channel title, if the document declares one
    pub title: Option<String>,
    /// Channel-level image metadata
    pub image: Option<FeedImage>,
    /// Entries in document order
    pub entries: Vec<RawEntry>,
}

/// Channel image as declared by the feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedImage {
    pub title: String,
    pub link: String,
    pub url: String,
}

/// One entry of a feed, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    /// Summary or description, possibly containing markup
    pub description: String,
    pub link: String,
    /// Category labels in document order
    pub categories: Vec<String>,
    /// Image the entry declares for itself (e.g. a media thumbnail)
    pub image: Option<EntryImage>,
    /// Attached media (RSS enclosures, media:content)
    pub enclosures: Vec<Enclosure>,
}

/// Image reference attached to a single entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryImage {
    pub url: String,
    pub title: Option<String>,
}

/// A media attachment of an entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    /// MIME type such as `image/png`, when declared
    pub mime_type: Option<String>,
}

/// Identity of the feed an item was published by
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub title: String,
    pub image: String,
    pub link: String,
}

/// Canonical, markup-free representation of one feed entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
    pub author: Author,
}

/// 16-byte fingerprint of an item's link, used as the dedup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityDigest([u8; 16]);

impl IdentityDigest {
    pub const LEN: usize = 16;

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex form, used by stores and logs
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for IdentityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Record of an item that has been delivered (for dedup across polls)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRecord {
    pub digest: IdentityDigest,
    /// Link the digest was computed from
    pub link: String,
    /// URL of the feed the item came from
    pub feed_url: String,
    /// When the item was recorded
    pub seen_at: OffsetDateTime,
}

/// Processing result for a single feed entry
#[derive(Debug)]
pub enum ProcessResult {
    /// Item was handed to the publisher (or would have been, in dry-run)
    Published {
        item: Item,
        delivery_id: Option<String>,
    },
    /// Item was skipped (already seen)
    Skipped { reason: String },
    /// Delivery failed; the item stays unseen
    Failed { error: String },
}
