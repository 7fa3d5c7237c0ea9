//! Poll use case - orchestrates fetching, filtering, dedup and delivery

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::{
    filter::TagSet,
    model::{Feed, IdentityDigest, Item, ProcessResult, SeenRecord},
    ports::{Clock, FeedSource, Publisher, SeenStore},
    scan::find_items,
};

/// Digests claimed by the items of one poll cycle
type Claims = Mutex<HashSet<IdentityDigest>>;

/// Configuration for the poll loop
#[derive(Debug, Clone)]
pub struct PollLoopConfig {
    /// Feed URLs to poll
    pub feeds: Vec<String>,
    /// Initial wanted tags (empty = keep everything)
    pub tags: TagSet,
    /// Dry run mode (don't actually publish)
    pub dry_run: bool,
    /// Maximum feeds fetched concurrently
    pub max_concurrent: usize,
}

impl Default for PollLoopConfig {
    fn default() -> Self {
        Self {
            feeds: vec![],
            tags: TagSet::new(),
            dry_run: true,
            max_concurrent: 4,
        }
    }
}

/// Poll loop orchestrator
pub struct PollLoop<F, P, St, Cl>
where
    F: FeedSource + ?Sized,
    P: Publisher + ?Sized,
    St: SeenStore + ?Sized,
    Cl: Clock + ?Sized,
{
    feed_source: Arc<F>,
    publisher: Arc<P>,
    seen_store: Arc<St>,
    clock: Arc<Cl>,
    config: PollLoopConfig,
    tags: RwLock<Arc<TagSet>>,
}

impl<F, P, St, Cl> PollLoop<F, P, St, Cl>
where
    F: FeedSource + ?Sized,
    P: Publisher + ?Sized,
    St: SeenStore + ?Sized,
    Cl: Clock + ?Sized,
{
    pub fn new(
        feed_source: Arc<F>,
        publisher: Arc<P>,
        seen_store: Arc<St>,
        clock: Arc<Cl>,
        config: PollLoopConfig,
    ) -> Self {
        let tags = RwLock::new(Arc::new(config.tags.clone()));
        Self {
            feed_source,
            publisher,
            seen_store,
            clock,
            config,
            tags,
        }
    }

    /// Snapshot of the wanted tags used by the next poll
    pub fn tags(&self) -> Arc<TagSet> {
        let guard = self.tags.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the wanted tags. Polls already running keep their snapshot.
    pub fn replace_tags(&self, tags: TagSet) {
        let mut guard = self.tags.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(tags);
    }

    /// Run a single poll cycle over all configured feeds.
    ///
    /// A feed that cannot be fetched is logged and skipped. Results are keyed by
    /// item link; feeds complete in any order, entries of one feed stay in
    /// document order.
    pub async fn poll_once(&self) -> Vec<(String, ProcessResult)> {
        let tags = self.tags();

        tracing::info!(
            feeds = self.config.feeds.len(),
            tags = ?tags.iter().collect::<Vec<_>>(),
            "Starting poll cycle"
        );

        let claims = Claims::default();
        let max_concurrent = self.config.max_concurrent.max(1);
        let mut tasks: FuturesUnordered<
            BoxFuture<'_, (&str, Result<Vec<(String, ProcessResult)>, PollError>)>,
        > = FuturesUnordered::new();
        let mut feeds_iter = self.config.feeds.iter();
        let mut results = Vec::new();

        loop {
            while tasks.len() < max_concurrent {
                let Some(url) = feeds_iter.next() else {
                    break;
                };
                let tags = Arc::clone(&tags);
                let claims = &claims;
                tasks.push(Box::pin(async move {
                    let result = self.scan_feed(url, &tags, claims).await;
                    (url.as_str(), result)
                }));
            }

            let Some((url, result)) = tasks.next().await else {
                break;
            };

            match result {
                Ok(feed_results) => results.extend(feed_results),
                Err(e) => {
                    tracing::error!(feed = %url, error = %e, "Failed to poll feed");
                    // Continue with other feeds
                }
            }
        }

        results
    }

    /// Poll a single feed with the given tag snapshot
    pub async fn poll_feed(
        &self,
        url: &str,
        tags: &TagSet,
    ) -> Result<Vec<(String, ProcessResult)>, PollError> {
        self.scan_feed(url, tags, &Claims::default()).await
    }

    async fn scan_feed(
        &self,
        url: &str,
        tags: &TagSet,
        claims: &Claims,
    ) -> Result<Vec<(String, ProcessResult)>, PollError> {
        tracing::debug!(feed = %url, "Fetching feed");

        let feed = self
            .feed_source
            .fetch_feed(url)
            .await
            .map_err(|e| PollError::FeedSource(e.to_string()))?;

        let entries = find_items(&feed, tags);

        tracing::info!(
            feed = %url,
            total = feed.entries.len(),
            matched = entries.len(),
            "Scanned feed"
        );

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let item = Item::new(&feed, entry);
            let link = item.link.clone();
            let result = self.process_item(url, &feed, item, claims).await;
            results.push((link, result));
        }

        Ok(results)
    }

    /// Dedup and deliver a single item
    async fn process_item(
        &self,
        feed_url: &str,
        feed: &Feed,
        item: Item,
        claims: &Claims,
    ) -> ProcessResult {
        let digest = item.identity_digest();

        // The same link may arrive from several feeds in one cycle
        if !claim(claims, digest) {
            return ProcessResult::Skipped {
                reason: "Already handled in this poll".to_string(),
            };
        }

        match self.seen_store.is_seen(&digest).await {
            Ok(true) => {
                return ProcessResult::Skipped {
                    reason: "Already seen".to_string(),
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, digest = %digest, "Failed to check seen state, continuing");
            }
            Ok(false) => {}
        }

        if self.config.dry_run {
            tracing::info!(
                feed = %feed_url,
                channel = ?feed.title,
                link = %item.link,
                title = %item.title,
                "[DRY RUN] Would publish"
            );
            return ProcessResult::Published {
                item,
                delivery_id: None,
            };
        }

        let mut delivery_id = None;
        if self.publisher.is_enabled() {
            match self.publisher.publish(&item).await {
                Ok(result) => {
                    delivery_id = Some(result.id);
                }
                Err(e) => {
                    tracing::error!(
                        platform = self.publisher.platform(),
                        link = %item.link,
                        error = %e,
                        "Failed to publish item"
                    );
                    release(claims, &digest);
                    return ProcessResult::Failed {
                        error: format!("Publish to {} failed: {}", self.publisher.platform(), e),
                    };
                }
            }
        }

        let record = SeenRecord {
            digest,
            link: item.link.clone(),
            feed_url: feed_url.to_string(),
            seen_at: self.clock.now(),
        };

        if let Err(e) = self.seen_store.mark_seen(&record).await {
            tracing::error!(error = %e, digest = %digest, "Failed to record seen item");
        }

        tracing::info!(
            feed = %feed_url,
            link = %item.link,
            delivery_id = ?delivery_id,
            "Published item"
        );

        ProcessResult::Published { item, delivery_id }
    }
}

fn claim(claims: &Claims, digest: IdentityDigest) -> bool {
    claims
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(digest)
}

fn release(claims: &Claims, digest: &IdentityDigest) {
    claims
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .remove(digest);
}

/// Errors from the poll loop
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("Feed source error: {0}")]
    FeedSource(String),
}
