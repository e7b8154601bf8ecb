use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

use config::{Config, StorageBackend};
use error::AppResult;
use services::{generator::ImageGenerator, inventory::InventoryStore};
use storage::{FileStorage, MemoryStorage, RedisStorage, StateStorage};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InventoryStore>,
    pub generator: Arc<dyn ImageGenerator>,
    pub config: Arc<Config>,
}

/// Opens the persistence backend selected by `STORAGE_BACKEND`.
pub async fn open_storage(config: &Config) -> AppResult<Arc<dyn StateStorage>> {
    let storage: Arc<dyn StateStorage> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileStorage::new(&config.storage.data_dir)),
        StorageBackend::Redis => Arc::new(RedisStorage::new(&config.redis_url()).await?),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    };
    Ok(storage)
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api::router::create_router(state.clone()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
