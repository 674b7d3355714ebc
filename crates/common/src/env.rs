//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Create `data_dir` when given; warn if the optional frontend directory is missing.
pub async fn ensure_env(frontend_dir: &str, data_dir: Option<&str>) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "frontend assets directory not found; only the JSON API is served");
    }
    if let Some(data_dir) = data_dir.filter(|d| !d.is_empty()) {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    }
    Ok(())
}
