use std::{io::ErrorKind, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use configs::WriteFailurePolicy;
use models::review::Review;
use tokio::fs;
use tracing::{debug, error, info, warn};

use super::PersistenceBackend;
use crate::errors::ServiceError;

/// JSON file holding the whole review collection as one array.
///
/// Reads fail open: a missing file is an empty collection and a corrupt one is
/// logged and treated the same way. Writes rewrite the file in full; what
/// happens when that fails is governed by [`WriteFailurePolicy`].
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    file_path: PathBuf,
    on_write_failure: WriteFailurePolicy,
}

impl JsonFileBackend {
    /// Prepare a backend for `path`, creating its parent directory if possible.
    pub async fn new<P: Into<PathBuf>>(path: P, on_write_failure: WriteFailurePolicy) -> Arc<Self> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!(path = %parent.display(), error = %e, "cannot create reviews directory");
            }
        }
        Arc::new(Self { file_path, on_write_failure })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn write_all(&self, reviews: &[Review]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(reviews).map_err(|e| ServiceError::Persistence(e.to_string()))?;
        fs::write(&self.file_path, data).await.map_err(|e| ServiceError::Persistence(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceBackend for JsonFileBackend {
    async fn load(&self) -> Vec<Review> {
        let path = self.file_path.display();
        match fs::read(&self.file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                debug!(%path, "reviews file is empty");
                Vec::new()
            }
            Ok(bytes) => match serde_json::from_slice::<Vec<Review>>(&bytes) {
                Ok(reviews) => {
                    info!(%path, count = reviews.len(), "loaded reviews");
                    reviews
                }
                Err(e) => {
                    warn!(%path, error = %e, "reviews file is corrupt; starting with an empty collection");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(%path, "no reviews file yet; starting with an empty collection");
                if let Err(e) = self.write_all(&[]).await {
                    warn!(%path, error = %e, "cannot initialize reviews file");
                }
                Vec::new()
            }
            Err(e) => {
                warn!(%path, error = %e, "cannot read reviews file; starting with an empty collection");
                Vec::new()
            }
        }
    }

    async fn save(&self, reviews: &[Review]) -> Result<(), ServiceError> {
        match self.write_all(reviews).await {
            Ok(()) => {
                debug!(path = %self.file_path.display(), count = reviews.len(), "saved reviews");
                Ok(())
            }
            Err(e) => match self.on_write_failure {
                WriteFailurePolicy::FailOpen => {
                    error!(path = %self.file_path.display(), error = %e, "failed to persist reviews; in-memory state kept");
                    Ok(())
                }
                WriteFailurePolicy::FailClosed => {
                    error!(path = %self.file_path.display(), error = %e, "failed to persist reviews; mutation rejected");
                    Err(e)
                }
            },
        }
    }
}
