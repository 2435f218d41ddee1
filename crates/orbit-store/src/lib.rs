//! Document store access.
//!
//! This crate provides:
//! - The `DocumentStore` trait the HTTP handlers are written against
//! - A MongoDB implementation with Stable API v1 and per-operation metrics
//! - An in-memory implementation with the same observable semantics

pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod mongo;
pub mod query;
pub mod store;

pub use config::MongoConfig;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use query::{FindQuery, SortSpec};
pub use store::DocumentStore;
