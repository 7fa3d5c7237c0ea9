//! Seams between the feed core and the outside world
//!
//! The poll use case only talks to these traits; `rfeed-adapters` provides
//! HTTP, SQLite and file-backed implementations.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{Feed, IdentityDigest, Item, SeenRecord};

#[derive(Debug, Error)]
pub enum FeedSourceError {
    #[error("feed request failed: {0}")]
    Network(String),
    #[error("feed server answered with status {0}")]
    HttpStatus(u16),
    #[error("feed body is larger than {limit} bytes")]
    TooLarge { limit: usize },
    #[error("feed could not be parsed: {0}")]
    Parse(String),
}

/// Fetches a feed document and turns it into a [`Feed`]
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self, url: &str) -> Result<Feed, FeedSourceError>;
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("delivery rejected: {0}")]
    Api(String),
    #[error("delivery target is rate limiting us")]
    RateLimited,
    #[error("delivery target refused our credentials: {0}")]
    Auth(String),
}

/// Receipt for a delivered item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub id: String,
    pub url: Option<String>,
}

/// Downstream sink for items that passed the tag filter
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, item: &Item) -> Result<PublishResult, PublishError>;

    /// A disabled publisher is skipped, but items are still recorded as seen
    fn is_enabled(&self) -> bool;

    /// Name used in logs, e.g. "webhook" or "outbox"
    fn platform(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("seen store failure: {0}")]
    Database(String),
    #[error("seen record could not be encoded: {0}")]
    Serialization(String),
}

/// Remembers the identity digests of items already handled.
///
/// `mark_seen` keeps the first record for a digest; later calls are no-ops.
#[async_trait]
pub trait SeenStore: Send + Sync {
    async fn is_seen(&self, digest: &IdentityDigest) -> Result<bool, StateError>;

    async fn mark_seen(&self, record: &SeenRecord) -> Result<(), StateError>;

    async fn get_seen(&self, digest: &IdentityDigest) -> Result<Option<SeenRecord>, StateError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
