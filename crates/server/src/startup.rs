use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig, StorageBackend, StorageConfig};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{
    reviews::ReviewStore,
    runtime,
    storage::{JsonFileBackend, MemoryBackend, PersistenceBackend},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", server.host, server.port)))
}

/// Open the review store on the configured backend.
pub async fn build_store(storage: &StorageConfig) -> Arc<ReviewStore> {
    let backend: Arc<dyn PersistenceBackend> = match storage.backend {
        StorageBackend::Memory => Arc::new(MemoryBackend),
        StorageBackend::File => JsonFileBackend::new(&storage.file_path, storage.write_failure).await,
    };
    let store = ReviewStore::open(backend, storage.id_strategy, storage.rating_policy).await;
    info!(
        backend = ?storage.backend,
        write_failure = ?storage.write_failure,
        count = store.len().await,
        "persistence backend selected"
    );
    store
}

/// Router wired to a freshly opened store; tests and `run` share this path.
pub async fn build_app(cfg: &AppConfig) -> Router {
    let store = build_store(&cfg.storage).await;
    let state = ServerState::new(store);
    routes::build_router(state, build_cors(), Some(Path::new(&cfg.server.frontend_dir)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app and serve it until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let data_dir = match cfg.storage.backend {
        StorageBackend::File => Path::new(&cfg.storage.file_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned()),
        StorageBackend::Memory => None,
    };
    runtime::ensure_env(&cfg.server.frontend_dir, data_dir.as_deref()).await?;

    let app = build_app(&cfg).await;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting review server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
