use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sticker_album::{
    build_app,
    config::Config,
    open_storage,
    services::{generator::PollinationsGenerator, inventory::InventoryStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sticker_album=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load();
    tracing::info!("Starting server in {} mode", config.server.environment);

    if config.exchange.assets.is_empty() {
        anyhow::bail!("EXCHANGE_ASSETS must name at least one sticker asset");
    }

    // Open the album
    let storage = open_storage(&config).await?;
    tracing::info!("Using {} storage", storage.name());
    let store = Arc::new(InventoryStore::open(storage, config.storage.key.clone()).await);

    // Image generator
    let generator = Arc::new(PollinationsGenerator::new(config.generator.clone())?);

    // Create app state
    let state = AppState {
        store,
        generator,
        config: Arc::new(config.clone()),
    };

    let app = build_app(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
