//! SQLite seen store implementation

use async_trait::async_trait;
use rfeed_domain::{IdentityDigest, SeenRecord, SeenStore, StateError};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// SQLite-backed seen store
pub struct SqliteSeenStore {
    pool: SqlitePool,
}

impl SqliteSeenStore {
    /// Create a new SQLite seen store, initializing the database if needed
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, StateError> {
        let db_path = db_path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StateError::Database(format!("Failed to create directory: {}", e)))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub async fn in_memory() -> Result<Self, StateError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StateError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_items (
                digest TEXT PRIMARY KEY,
                link TEXT NOT NULL,
                feed_url TEXT NOT NULL,
                seen_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl SeenStore for SqliteSeenStore {
    async fn is_seen(&self, digest: &IdentityDigest) -> Result<bool, StateError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen_items WHERE digest = ?")
            .bind(digest.to_hex())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(count.0 > 0)
    }

    async fn mark_seen(&self, record: &SeenRecord) -> Result<(), StateError> {
        let seen_at_str = record
            .seen_at
            .format(&Rfc3339)
            .map_err(|e| StateError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO seen_items (digest, link, feed_url, seen_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(digest) DO NOTHING
            "#,
        )
        .bind(record.digest.to_hex())
        .bind(&record.link)
        .bind(&record.feed_url)
        .bind(&seen_at_str)
        .execute(&self.pool)
        .await
        .map_err(|e| StateError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_seen(&self, digest: &IdentityDigest) -> Result<Option<SeenRecord>, StateError> {
        let row: Option<(String, String, String)> =
            sqlx::query_as("SELECT link, feed_url, seen_at FROM seen_items WHERE digest = ?")
                .bind(digest.to_hex())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StateError::Database(e.to_string()))?;

        match row {
            Some((link, feed_url, seen_at_str)) => {
                let seen_at = OffsetDateTime::parse(&seen_at_str, &Rfc3339)
                    .map_err(|e| StateError::Serialization(e.to_string()))?;

                Ok(Some(SeenRecord {
                    digest: *digest,
                    link,
                    feed_url,
                    seen_at,
                }))
            }
            None => Ok(None),
        }
    }
}
