pub mod catalog;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod ui;

use std::{path::Path, sync::Arc};

use catalog::Catalog;
use config::Config;
use db::{create_pool, SqliteHistoryStore};
use routes::{create_router, AppState};
use services::{ContentRecommender, VectorizerParams};

/// Loads the catalog and fits the recommender on it
pub fn load_recommender(config: &Config) -> anyhow::Result<ContentRecommender> {
    let catalog = Catalog::ensure_processed(
        Path::new(&config.catalog_path),
        Path::new(&config.processed_path),
    )?;

    let params = VectorizerParams {
        max_features: config.max_features,
        ..VectorizerParams::default()
    };
    let recommender = ContentRecommender::fit(Arc::new(catalog), params);

    tracing::info!(
        movies = recommender.catalog().len(),
        vocabulary = recommender.vectorizer().vocabulary_size(),
        "Recommender ready"
    );

    Ok(recommender)
}

/// Builds the catalog, the model and the history store, then serves the API
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let loader_config = config.clone();
    let recommender = tokio::task::spawn_blocking(move || load_recommender(&loader_config)).await??;

    let pool = create_pool(&config.database_url).await?;
    let store = SqliteHistoryStore::new(
        pool,
        config.search_history_limit,
        config.view_history_limit,
    )
    .await?;
    tracing::info!("Database connection established");

    let state = AppState::new(recommender, Arc::new(store), &config.user_id);
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
