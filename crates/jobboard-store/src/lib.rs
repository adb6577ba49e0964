//! Document store access for the job board.
//!
//! This crate provides:
//! - Repository traits for the `jobs` and `applications` collections
//! - A MongoDB-backed store used in production
//! - An in-memory store for tests and local runs
//! - Store configuration from environment variables

pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod mongo;
pub mod repos;

use std::sync::Arc;

pub use config::{StoreBackend, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use repos::{ApplicationRepository, DocumentStore, JobRepository};

/// Build the store selected by `config`.
///
/// The MongoDB client does not open a connection until the first operation.
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mongo => Ok(Arc::new(MongoStore::new(config).await?)),
    }
}
