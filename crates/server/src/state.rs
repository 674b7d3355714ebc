use std::sync::Arc;

use service::reviews::ReviewRepository;

/// Shared handler state; constructed once per process (or per test).
#[derive(Clone)]
pub struct ServerState {
    pub reviews: Arc<dyn ReviewRepository>,
}

impl ServerState {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }
}
