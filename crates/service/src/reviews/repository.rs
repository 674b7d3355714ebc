use async_trait::async_trait;
use models::review::{Review, ReviewId, ReviewInput};

use crate::errors::ServiceError;

/// Trait abstraction for review storage as seen by request handlers.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn list(&self) -> Vec<Review>;
    async fn get(&self, id: ReviewId) -> Option<Review>;
    async fn create(&self, input: ReviewInput) -> Result<Review, ServiceError>;
    async fn update(&self, id: ReviewId, input: ReviewInput) -> Result<Review, ServiceError>;
    async fn delete(&self, id: ReviewId) -> Result<Review, ServiceError>;
}
