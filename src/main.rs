use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use moviemate::{
    config::Config,
    engine::Engine,
    routes::{create_router, AppState},
    services::{load_catalog, JsonCatalogSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moviemate=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let source = JsonCatalogSource::new(&config.catalog_path);
    let catalog = load_catalog(&source).await.with_context(|| {
        format!(
            "Movie catalog not found or unreadable at {}",
            config.catalog_path
        )
    })?;

    let engine = Arc::new(Engine::new(catalog, config.engine_config()));

    if config.warm_up_on_start {
        let warming = Arc::clone(&engine);
        let stats = tokio::task::spawn_blocking(move || warming.warm_up().map(|_| warming.stats()))
            .await?
            .context("Failed to build the similarity index")?;
        tracing::info!(
            item_count = stats.item_count,
            vocabulary_size = ?stats.vocabulary_size,
            "Engine warmed up"
        );
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState {
        engine,
        config: Arc::new(config),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "MovieMate listening");
    axum::serve(listener, app).await?;

    Ok(())
}
