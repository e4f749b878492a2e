use std::sync::Arc;

use crate::{
    db::HistoryRepo,
    models::StatsSnapshot,
    services::{build_stats, ContentRecommender},
};

/// Shared application state
///
/// The recommender and the stats snapshot are built once from the catalog and
/// never change afterwards; history lives behind the repository.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<ContentRecommender>,
    pub stats: Arc<StatsSnapshot>,
    pub history: Arc<dyn HistoryRepo>,
    pub user_id: Arc<str>,
}

impl AppState {
    pub fn new(recommender: ContentRecommender, history: Arc<dyn HistoryRepo>, user_id: &str) -> Self {
        let stats = build_stats(recommender.catalog());
        Self {
            recommender: Arc::new(recommender),
            stats: Arc::new(stats),
            history,
            user_id: Arc::from(user_id),
        }
    }
}
