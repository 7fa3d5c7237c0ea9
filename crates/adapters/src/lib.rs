//! rfeed adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `feeds`: feed-rs based parsing and the HTTP feed source
//! - `state`: SQLite and in-memory seen stores
//! - `webhook`: HTTP webhook publisher
//! - `outbox`: JSONL outbox publisher for review-before-publish

pub mod feeds;
pub mod outbox;
mod state_memory;
mod state_sqlite;
pub mod webhook;

/// Re-exports for state adapters
pub mod state {
    pub use crate::state_memory::InMemorySeenStore;
    pub use crate::state_sqlite::SqliteSeenStore;
}
