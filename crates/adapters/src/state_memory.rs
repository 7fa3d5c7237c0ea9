//! In-memory seen store for testing and offline mode

use async_trait::async_trait;
use rfeed_domain::{IdentityDigest, SeenRecord, SeenStore, StateError};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory seen store implementation
pub struct InMemorySeenStore {
    seen: RwLock<HashMap<IdentityDigest, SeenRecord>>,
}

impl InMemorySeenStore {
    pub fn new() -> Self {
        Self {
            seen: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySeenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeenStore for InMemorySeenStore {
    async fn is_seen(&self, digest: &IdentityDigest) -> Result<bool, StateError> {
        let seen = self
            .seen
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(seen.contains_key(digest))
    }

    async fn mark_seen(&self, record: &SeenRecord) -> Result<(), StateError> {
        let mut seen = self
            .seen
            .write()
            .map_err(|e| StateError::Database(e.to_string()))?;
        seen.entry(record.digest).or_insert_with(|| record.clone());
        Ok(())
    }

    async fn get_seen(&self, digest: &IdentityDigest) -> Result<Option<SeenRecord>, StateError> {
        let seen = self
            .seen
            .read()
            .map_err(|e| StateError::Database(e.to_string()))?;
        Ok(seen.get(digest).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfeed_domain::identity::link_digest;
    use time::OffsetDateTime;

    fn record(link: &str) -> SeenRecord {
        SeenRecord {
            digest: link_digest(link),
            link: link.to_string(),
            feed_url: "https://example.com/feed.xml".to_string(),
            seen_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn test_seen_record_roundtrip() {
        let store = InMemorySeenStore::new();
        let record = record("https://example1.com/");

        assert!(!store.is_seen(&record.digest).await.unwrap());
        store.mark_seen(&record).await.unwrap();
        assert!(store.is_seen(&record.digest).await.unwrap());

        let retrieved = store.get_seen(&record.digest).await.unwrap();
        assert_eq!(retrieved, Some(record));
    }

    #[tokio::test]
    async fn test_get_unknown_digest() {
        let store = InMemorySeenStore::new();
        let result = store
            .get_seen(&link_digest("https://nowhere.example/"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_mark_seen_twice_keeps_first_record() {
        let store = InMemorySeenStore::new();
        let first = record("https://example1.com/");
        let mut second = first.clone();
        second.feed_url = "https://mirror.example.com/feed.xml".to_string();

        store.mark_seen(&first).await.unwrap();
        store.mark_seen(&second).await.unwrap();

        let retrieved = store.get_seen(&first.digest).await.unwrap().unwrap();
        assert_eq!(retrieved.feed_url, first.feed_url);
    }
}
