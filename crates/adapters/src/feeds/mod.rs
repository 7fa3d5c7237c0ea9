//! Feed source adapters
//!
//! - [`parse_feed`] turns RSS/Atom bytes into a domain `Feed` using `feed-rs`
//! - [`HttpFeedSource`] fetches feeds over HTTP
//! - [`StubFeedSource`] serves fixed feeds for tests and offline runs

mod http;
mod parser;

pub use http::HttpFeedSource;
pub use parser::parse_feed;

use async_trait::async_trait;
use rfeed_domain::{Feed, FeedSource, FeedSourceError};
use std::collections::HashMap;

/// Stub feed source for testing
#[derive(Debug, Default)]
pub struct StubFeedSource {
    feeds: HashMap<String, Feed>,
}

impl StubFeedSource {
    /// Create an empty stub
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serve `feed` for `url`
    pub fn with_feed(mut self, url: impl Into<String>, feed: Feed) -> Self {
        self.feeds.insert(url.into(), feed);
        self
    }
}

#[async_trait]
impl FeedSource for StubFeedSource {
    async fn fetch_feed(&self, url: &str) -> Result<Feed, FeedSourceError> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or(FeedSourceError::HttpStatus(404))
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0">
<channel>
	<title>Title</title>
	<link>https://example.com/</link>
	<description>Description</description>
	<generator>https://example.com/</generator>
	<image>
		<title>Image Title</title>
		<link>https://example.com/</link>
		<url>https://example.com/icon.png</url>
	</image>
	<item>
		<title>Item Title 1</title>
		<link>https://example1.com/</link>
		<description>Item description 1</description>
		<category><![CDATA[Test1]]></category>
		<category><![CDATA[Test2]]></category>
	</item>
	<item>
		<title>Item Title 2</title>
		<link>https://example2.com/</link>
		<description>Item description 2</description>
		<category><![CDATA[Test1]]></category>
		<category><![CDATA[Test3]]></category>
	</item>
</channel>
</rss>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbox::{OutboxPublisher, OutboxWriter};
    use crate::state::InMemorySeenStore;
    use rfeed_domain::usecases::{PollLoop, PollLoopConfig};
    use rfeed_domain::{ProcessResult, SeenStore, SystemClock, TagSet};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stub_serves_configured_feed() {
        let feed = parse_feed(SAMPLE_RSS.as_bytes()).unwrap();
        let source = StubFeedSource::empty().with_feed("https://example.com/rss", feed.clone());

        assert_eq!(source.fetch_feed("https://example.com/rss").await.unwrap(), feed);
        assert!(matches!(
            source.fetch_feed("https://example.com/other").await,
            Err(FeedSourceError::HttpStatus(404))
        ));
    }

    #[tokio::test]
    async fn test_poll_parsed_feed_into_outbox() {
        let url = "https://example.com/rss";
        let feed = parse_feed(SAMPLE_RSS.as_bytes()).unwrap();
        let source = Arc::new(StubFeedSource::empty().with_feed(url, feed));
        let store = Arc::new(InMemorySeenStore::new());

        let dir = tempfile::TempDir::new().unwrap();
        let outbox_path = dir.path().join("outbox.jsonl");
        let publisher = Arc::new(OutboxPublisher::new(
            OutboxWriter::new(outbox_path.clone()).await.unwrap(),
        ));

        let poller = PollLoop::new(
            source,
            publisher,
            Arc::clone(&store),
            Arc::new(SystemClock),
            PollLoopConfig {
                feeds: vec![url.to_string()],
                tags: TagSet::from_iter(["Test3"]),
                dry_run: false,
                max_concurrent: 1,
            },
        );

        let results = poller.poll_once().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "https://example2.com/");
        let ProcessResult::Published { item, delivery_id } = &results[0].1 else {
            panic!("expected published, got {:?}", results[0].1);
        };
        assert_eq!(item.title, "Item Title 2");
        assert!(delivery_id.is_some());
        assert!(store.is_seen(&item.identity_digest()).await.unwrap());

        let again = poller.poll_once().await;
        assert!(matches!(again[0].1, ProcessResult::Skipped { .. }));

        let lines = std::fs::read_to_string(&outbox_path).unwrap();
        assert_eq!(lines.lines().count(), 1);
    }
}
