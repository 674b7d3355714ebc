#![cfg(test)]
use std::path::PathBuf;

use chrono::Utc;
use models::review::{Review, ReviewId, ReviewInput};
use serde_json::json;
use uuid::Uuid;

pub fn sample_input() -> ReviewInput {
    ReviewInput {
        reviewer: Some("Anna".into()),
        book_title: Some("Snö".into()),
        author: Some("Lina".into()),
        review: Some("Bra bok".into()),
        rating: Some(json!(4)),
    }
}

pub fn sample_review(id: ReviewId) -> Review {
    Review {
        id,
        reviewer: "Anna".into(),
        book_title: "Snö".into(),
        author: "Lina".into(),
        review: "Bra bok".into(),
        rating: 4,
        timestamp: Utc::now(),
    }
}

/// Unique file path under the system temp dir; nothing is created.
pub fn temp_file(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.json", prefix, Uuid::new_v4()))
}
