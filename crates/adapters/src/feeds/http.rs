//! HTTP feed source

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use rfeed_domain::{Feed, FeedSource, FeedSourceError};
use std::time::Duration;

use super::parser::parse_feed;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Feed source that downloads feeds with `reqwest` and parses them with `feed-rs`
pub struct HttpFeedSource {
    client: Client,
    max_bytes: usize,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FeedSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FeedSourceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            max_bytes: MAX_FEED_SIZE,
        })
    }

    /// Override the response size limit
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_feed(&self, url: &str) -> Result<Feed, FeedSourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedSourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedSourceError::HttpStatus(status.as_u16()));
        }

        let body = read_limited(response, self.max_bytes).await?;

        tracing::debug!(feed = %url, bytes = body.len(), "Downloaded feed");

        parse_feed(&body)
    }
}

/// Read the body, giving up as soon as it grows past `limit` bytes
async fn read_limited(response: Response, limit: usize) -> Result<Vec<u8>, FeedSourceError> {
    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(FeedSourceError::TooLarge { limit });
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FeedSourceError::Network(e.to_string()))?;
        if body.len().saturating_add(chunk.len()) > limit {
            return Err(FeedSourceError::TooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
