//! Dedup identity for items
//!
//! The digest is an MD5 of the item link. It is a lookup key for the seen
//! store and is never used for integrity checks.

use md5::{Digest, Md5};

use crate::model::{IdentityDigest, Item};

/// Digest of the UTF-8 bytes of `link`
pub fn link_digest(link: &str) -> IdentityDigest {
    let hash = Md5::digest(link.as_bytes());
    let mut bytes = [0u8; IdentityDigest::LEN];
    bytes.copy_from_slice(&hash);
    IdentityDigest::from_bytes(bytes)
}

impl Item {
    /// Dedup key of this item. Depends on the link only.
    pub fn identity_digest(&self) -> IdentityDigest {
        link_digest(&self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::sample_feed;

    #[test]
    fn test_known_digest() {
        let digest = link_digest("https://example1.com/");
        assert_eq!(digest.to_hex().len(), 32);
        assert_eq!(digest, link_digest("https://example1.com/"));
        assert_eq!(link_digest("").to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_digest_matches_link_hash() {
        let feed = sample_feed();
        for entry in &feed.entries {
            let item = Item::new(&feed, entry);
            let expected = Md5::digest(item.link.as_bytes());
            assert_eq!(item.identity_digest().as_bytes()[..], expected[..]);
        }
    }

    #[test]
    fn test_digest_ignores_other_fields() {
        let feed = sample_feed();
        let item = Item::new(&feed, &feed.entries[0]);
        let mut changed = item.clone();
        changed.title = "Another title".to_string();
        changed.description = "Another description".to_string();
        changed.image = "https://example.com/other.png".to_string();
        changed.author.title = "Someone else".to_string();

        assert_eq!(item.identity_digest(), changed.identity_digest());
    }

    #[test]
    fn test_digest_sensitive_to_link() {
        let feed = sample_feed();
        for entry in &feed.entries {
            let item = Item::new(&feed, entry);
            assert_ne!(
                item.identity_digest(),
                link_digest(&format!("{}test", item.link))
            );
        }

        let first = Item::new(&feed, &feed.entries[0]);
        let second = Item::new(&feed, &feed.entries[1]);
        assert_ne!(first.identity_digest(), second.identity_digest());
    }
}
