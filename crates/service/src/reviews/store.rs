use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use configs::{IdStrategy, RatingPolicy};
use models::review::{Review, ReviewId, ReviewInput};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::repository::ReviewRepository;
use crate::errors::ServiceError;
use crate::ids::{allocator_for, IdAllocator};
use crate::storage::PersistenceBackend;

/// Authoritative review collection in insertion order.
///
/// Every mutation holds the write guard across its read-modify-persist
/// sequence, so mutations form one linear history and readers never see a
/// half-applied change. When the backend rejects a save the mutation is undone
/// before the guard is released.
pub struct ReviewStore {
    reviews: RwLock<Vec<Review>>,
    backend: Arc<dyn PersistenceBackend>,
    ids: Arc<dyn IdAllocator>,
    rating_policy: RatingPolicy,
}

impl ReviewStore {
    /// Load the backend once and seed the id allocator from what it returned.
    pub async fn open(
        backend: Arc<dyn PersistenceBackend>,
        id_strategy: IdStrategy,
        rating_policy: RatingPolicy,
    ) -> Arc<Self> {
        let reviews = backend.load().await;
        let ids = allocator_for(id_strategy, &reviews);
        info!(count = reviews.len(), ?id_strategy, ?rating_policy, "review store opened");
        Arc::new(Self { reviews: RwLock::new(reviews), backend, ids, rating_policy })
    }

    /// Number of reviews currently held.
    pub async fn len(&self) -> usize {
        self.reviews.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reviews.read().await.is_empty()
    }

    /// All reviews in collection order.
    pub async fn list(&self) -> Vec<Review> {
        self.reviews.read().await.clone()
    }

    pub async fn get(&self, id: ReviewId) -> Option<Review> {
        self.reviews.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Validate, assign a fresh id and timestamp, append and persist.
    pub async fn create(&self, input: ReviewInput) -> Result<Review, ServiceError> {
        let fields = input.validate(self.rating_policy)?;
        let mut reviews = self.reviews.write().await;
        let rec = Review::new(self.ids.next(), fields, Utc::now());
        reviews.push(rec.clone());
        if let Err(e) = self.backend.save(&reviews).await {
            reviews.pop();
            return Err(e);
        }
        info!(id = %rec.id, count = reviews.len(), "review created");
        Ok(rec)
    }

    /// Replace every field but `id` in place; position is kept.
    pub async fn update(&self, id: ReviewId, input: ReviewInput) -> Result<Review, ServiceError> {
        let mut reviews = self.reviews.write().await;
        let idx = reviews.iter().position(|r| r.id == id).ok_or_else(|| ServiceError::not_found("review"))?;
        let fields = input.validate(self.rating_policy)?;

        let previous = reviews[idx].clone();
        reviews[idx].apply(fields, Utc::now());
        if let Err(e) = self.backend.save(&reviews).await {
            reviews[idx] = previous;
            return Err(e);
        }
        info!(%id, "review updated");
        Ok(reviews[idx].clone())
    }

    /// Remove and return the review. Deleting the same id twice reports
    /// `NotFound` the second time.
    pub async fn delete(&self, id: ReviewId) -> Result<Review, ServiceError> {
        let mut reviews = self.reviews.write().await;
        let idx = reviews.iter().position(|r| r.id == id).ok_or_else(|| ServiceError::not_found("review"))?;

        let removed = reviews.remove(idx);
        if let Err(e) = self.backend.save(&reviews).await {
            reviews.insert(idx, removed);
            return Err(e);
        }
        info!(%id, count = reviews.len(), "review deleted");
        debug!(reviewer = %removed.reviewer, book_title = %removed.book_title, "deleted review details");
        Ok(removed)
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn list(&self) -> Vec<Review> {
        self.list().await
    }

    async fn get(&self, id: ReviewId) -> Option<Review> {
        self.get(id).await
    }

    async fn create(&self, input: ReviewInput) -> Result<Review, ServiceError> {
        self.create(input).await
    }

    async fn update(&self, id: ReviewId, input: ReviewInput) -> Result<Review, ServiceError> {
        self.update(id, input).await
    }

    async fn delete(&self, id: ReviewId) -> Result<Review, ServiceError> {
        self.delete(id).await
    }
}
