//! Review collection: the store and the trait the HTTP layer consumes.

pub mod repository;
pub mod store;

pub use repository::ReviewRepository;
pub use store::ReviewStore;
