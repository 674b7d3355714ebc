use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use configs::RatingPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::ModelError;

/// Review identifier. Which variant is produced depends on the id strategy
/// the store was opened with; both shapes may coexist in an old data file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReviewId {
    Seq(u64),
    Token(Uuid),
}

impl ReviewId {
    /// Interpret a path segment. Digits are a sequential id, anything else
    /// must be a UUID; `None` means no review can carry this id.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse::<u64>().ok().map(ReviewId::Seq);
        }
        Uuid::parse_str(raw).ok().map(ReviewId::Token)
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewId::Seq(n) => write!(f, "{n}"),
            ReviewId::Token(u) => write!(f, "{u}"),
        }
    }
}

impl FromStr for ReviewId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ModelError::Validation(format!("invalid review id: {s}")))
    }
}

/// A stored book review.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub reviewer: String,
    pub book_title: String,
    pub author: String,
    pub review: String,
    pub rating: i64,
    pub timestamp: DateTime<Utc>,
}

impl Review {
    pub fn new(id: ReviewId, fields: ReviewFields, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            reviewer: fields.reviewer,
            book_title: fields.book_title,
            author: fields.author,
            review: fields.review,
            rating: fields.rating,
            timestamp,
        }
    }

    /// Replace every field except `id`.
    pub fn apply(&mut self, fields: ReviewFields, timestamp: DateTime<Utc>) {
        self.reviewer = fields.reviewer;
        self.book_title = fields.book_title;
        self.author = fields.author;
        self.review = fields.review;
        self.rating = fields.rating;
        self.timestamp = timestamp;
    }
}

/// Create/update payload as submitted by a client. Every field is optional on
/// the wire so that a missing field surfaces as a validation error instead of
/// a body rejection. Client-sent `id`/`timestamp` keys are not part of the
/// payload and are dropped during deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub review: Option<String>,
    /// JSON integer or numeric string (HTML forms submit strings).
    #[serde(default)]
    pub rating: Option<Value>,
}

/// Validated review content, ready to be stamped with an id and time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewFields {
    pub reviewer: String,
    pub book_title: String,
    pub author: String,
    pub review: String,
    pub rating: i64,
}

impl ReviewInput {
    /// Check required fields and the rating. Text is kept verbatim; blank
    /// text counts as missing.
    pub fn validate(&self, policy: RatingPolicy) -> Result<ReviewFields, ModelError> {
        let mut missing: Vec<&'static str> = Vec::new();
        let reviewer = required_text(&self.reviewer, "reviewer", &mut missing);
        let book_title = required_text(&self.book_title, "bookTitle", &mut missing);
        let author = required_text(&self.author, "author", &mut missing);
        let review = required_text(&self.review, "review", &mut missing);

        let mut problems = Vec::new();
        let rating = match parse_rating(self.rating.as_ref()) {
            Rating::Missing => {
                missing.push("rating");
                None
            }
            Rating::NotInteger => {
                problems.push("rating must be an integer".to_string());
                None
            }
            Rating::Value(r) if policy == RatingPolicy::Strict && !(0..=5).contains(&r) => {
                problems.push(format!("rating must be between 0 and 5, got {r}"));
                None
            }
            Rating::Value(r) => Some(r),
        };

        if !missing.is_empty() {
            problems.insert(0, format!("missing required fields: {}", missing.join(", ")));
        }
        if !problems.is_empty() {
            return Err(ModelError::Validation(problems.join("; ")));
        }

        match (reviewer, book_title, author, review, rating) {
            (Some(reviewer), Some(book_title), Some(author), Some(review), Some(rating)) => {
                Ok(ReviewFields { reviewer, book_title, author, review, rating })
            }
            _ => Err(ModelError::Validation("incomplete review".into())),
        }
    }
}

fn required_text(value: &Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.clone()),
        _ => {
            missing.push(name);
            None
        }
    }
}

enum Rating {
    Missing,
    NotInteger,
    Value(i64),
}

fn parse_rating(value: Option<&Value>) -> Rating {
    match value {
        None | Some(Value::Null) => Rating::Missing,
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Rating::Value(i)
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Rating::Value(f as i64),
                    _ => Rating::NotInteger,
                }
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Rating::Missing
            } else {
                s.parse::<i64>().map(Rating::Value).unwrap_or(Rating::NotInteger)
            }
        }
        Some(_) => Rating::NotInteger,
    }
}
