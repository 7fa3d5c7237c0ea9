//! rfeed domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Feed input shapes, canonical items and value objects
//! - `sanitize`, `resolve`, `normalize`, `identity`: turning a raw entry into an `Item`
//! - `filter`, `scan`: deciding which entries of a feed are wanted
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Application use cases / business logic

pub mod filter;
pub mod identity;
pub mod model;
pub mod normalize;
pub mod ports;
pub mod resolve;
pub mod sanitize;
pub mod scan;
pub mod usecases;

pub use filter::{TagSet, should_skip};
pub use model::*;
pub use ports::*;
pub use scan::find_items;
