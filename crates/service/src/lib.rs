//! Service layer owning the review collection.
//! - Separates business rules from HTTP framing.
//! - Reuses entity definitions and validation from the `models` crate.
//! - Persistence and id allocation are swappable behind traits.

pub mod errors;
pub mod ids;
pub mod runtime;
pub mod storage;
pub mod reviews;
#[cfg(test)]
pub mod test_support;
