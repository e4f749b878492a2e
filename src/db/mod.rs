pub mod sqlite;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{SearchEntry, ViewEntry, ViewRecord},
};

pub use sqlite::{create_pool, SqliteHistoryStore};

/// Upper bound on rows returned by a full history read
pub const HISTORY_READ_LIMIT: i64 = 1000;

/// Per-user search and view history
#[async_trait]
pub trait HistoryRepo: Send + Sync {
    /// Records a search and trims the user's searches to the retention limit
    async fn add_search(&self, user_id: &str, query: &str, top_k: i64, result_count: i64) -> AppResult<()>;

    /// Records a view, replacing any earlier view of the same movie, and trims
    /// the user's views to the retention limit
    async fn add_view(&self, user_id: &str, view: &ViewRecord) -> AppResult<()>;

    /// Most recent searches first
    async fn searches(&self, user_id: &str, limit: i64) -> AppResult<Vec<SearchEntry>>;

    /// Most recent views first
    async fn views(&self, user_id: &str, limit: i64) -> AppResult<Vec<ViewEntry>>;

    async fn clear(&self, user_id: &str) -> AppResult<()>;
}
