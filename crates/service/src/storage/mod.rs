//! Persistence backends for the review collection.
//!
//! The store owns the collection; a backend only turns it into bytes and
//! back. `load` runs once when the store opens, `save` after every mutation
//! with the complete collection.

use async_trait::async_trait;
use models::review::Review;

use crate::errors::ServiceError;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;

#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Previously saved reviews in stored order. Never fails: unreadable
    /// state degrades to an empty collection.
    async fn load(&self) -> Vec<Review>;

    /// Replace the persisted state with `reviews`. An `Err` tells the store to
    /// discard the mutation; backends that tolerate write failures return `Ok`.
    async fn save(&self, reviews: &[Review]) -> Result<(), ServiceError>;
}
