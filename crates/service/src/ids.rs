//! Review id allocation.
//!
//! The strategy is fixed when the store is opened. Allocation is lock-free so
//! it never waits on the store's collection lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use configs::IdStrategy;
use models::review::{Review, ReviewId};
use uuid::Uuid;

/// Source of fresh review ids.
pub trait IdAllocator: Send + Sync {
    /// An id not carried by any review currently in the store.
    fn next(&self) -> ReviewId;
}

/// Monotonic counter starting at 1. Ids are never handed out twice by one
/// allocator, including ids of deleted reviews.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: AtomicU64::new(first.max(1)) }
    }

    /// Continue after the highest sequential id found in `existing`.
    ///
    /// Only the surviving reviews are seen: ids above the highest survivor
    /// that were deleted before a restart are issued again.
    pub fn resume_after(existing: &[Review]) -> Self {
        let max = existing
            .iter()
            .filter_map(|r| match r.id {
                ReviewId::Seq(n) => Some(n),
                ReviewId::Token(_) => None,
            })
            .max()
            .unwrap_or(0);
        Self::starting_at(max.saturating_add(1))
    }
}

impl Default for SequentialIds {
    fn default() -> Self { Self::new() }
}

impl IdAllocator for SequentialIds {
    fn next(&self) -> ReviewId {
        ReviewId::Seq(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Random UUID v4 per review; collisions are not checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdAllocator for RandomIds {
    fn next(&self) -> ReviewId {
        ReviewId::Token(Uuid::new_v4())
    }
}

/// Build the allocator for `strategy`, seeded from an already loaded collection.
pub fn allocator_for(strategy: IdStrategy, existing: &[Review]) -> Arc<dyn IdAllocator> {
    match strategy {
        IdStrategy::Sequential => Arc::new(SequentialIds::resume_after(existing)),
        IdStrategy::Uuid => Arc::new(RandomIds),
    }
}
