//! JSONL outbox used by `rfeed run --require-approval`
//!
//! Each delivered item becomes one line `{"id", "digest", "item"}` that a
//! reviewer can forward by hand.

use async_trait::async_trait;
use rfeed_domain::{Item, PublishError, PublishResult, Publisher};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("outbox file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("outbox entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only handle on the outbox file, shared between clones
#[derive(Debug, Clone)]
pub struct OutboxWriter {
    path: PathBuf,
    file: Arc<Mutex<tokio::fs::File>>,
}

impl OutboxWriter {
    /// Open `path` for appending, creating it and its directory if missing
    pub async fn new(path: PathBuf) -> Result<Self, OutboxError> {
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path).await?;

        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `record` as a single JSON line
    async fn write_line<T: Serialize>(&self, record: &T) -> Result<(), OutboxError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct OutboxLine<'a> {
    id: String,
    digest: String,
    item: &'a Item,
}

/// [`Publisher`] that parks items in the outbox instead of sending them
#[derive(Debug, Clone)]
pub struct OutboxPublisher {
    writer: OutboxWriter,
}

impl OutboxPublisher {
    pub fn new(writer: OutboxWriter) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl Publisher for OutboxPublisher {
    async fn publish(&self, item: &Item) -> Result<PublishResult, PublishError> {
        let id = Uuid::new_v4().to_string();
        let line = OutboxLine {
            id: id.clone(),
            digest: item.identity_digest().to_hex(),
            item,
        };

        self.writer.write_line(&line).await.map_err(|e| {
            PublishError::Api(format!("{}: {}", self.writer.path().display(), e))
        })?;

        tracing::debug!(id = %id, link = %item.link, "Item parked in outbox");

        Ok(PublishResult { id, url: None })
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn platform(&self) -> &'static str {
        "outbox"
    }
}
