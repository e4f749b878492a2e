use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::HistoryRepo;
use crate::{
    error::AppResult,
    models::{SearchEntry, ViewEntry, ViewRecord},
};

/// Creates a SQLite connection pool
///
/// File databases get their parent directory created on first use. In-memory
/// databases live only as long as their connection, so they are pinned to a
/// single connection that is never recycled.
pub async fn create_pool(database_url: &str) -> anyhow::Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    if !in_memory {
        if let Some(path) = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
        {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    Ok(pool)
}

/// History store backed by the `search_history` and `view_history` tables
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
    search_limit: i64,
    view_limit: i64,
}

impl SqliteHistoryStore {
    /// Runs pending migrations and returns a store keeping at most
    /// `search_limit` searches and `view_limit` views per user
    pub async fn new(pool: SqlitePool, search_limit: i64, view_limit: i64) -> AppResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!(search_limit, view_limit, "History store ready");

        Ok(Self {
            pool,
            search_limit,
            view_limit,
        })
    }
}

#[async_trait]
impl HistoryRepo for SqliteHistoryStore {
    async fn add_search(&self, user_id: &str, query: &str, top_k: i64, result_count: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO search_history (user_id, query, top_k, result_count, timestamp)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(query)
        .bind(top_k)
        .bind(result_count)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM search_history
             WHERE user_id = ? AND id NOT IN (
                 SELECT id FROM search_history WHERE user_id = ?
                 ORDER BY id DESC LIMIT ?
             )",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(self.search_limit)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn add_view(&self, user_id: &str, view: &ViewRecord) -> AppResult<()> {
        let movie_id = view.movie_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM view_history WHERE user_id = ? AND movie_id = ?")
            .bind(user_id)
            .bind(&movie_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO view_history (user_id, movie_id, title, genres, rating, timestamp)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&movie_id)
        .bind(&view.title)
        .bind(&view.genres)
        .bind(view.rating)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM view_history
             WHERE user_id = ? AND id NOT IN (
                 SELECT id FROM view_history WHERE user_id = ?
                 ORDER BY id DESC LIMIT ?
             )",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(self.view_limit)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn searches(&self, user_id: &str, limit: i64) -> AppResult<Vec<SearchEntry>> {
        let rows = sqlx::query_as::<_, SearchEntry>(
            "SELECT query, top_k, result_count, timestamp FROM search_history
             WHERE user_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn views(&self, user_id: &str, limit: i64) -> AppResult<Vec<ViewEntry>> {
        let rows = sqlx::query_as::<_, ViewEntry>(
            "SELECT movie_id, title, genres, rating, timestamp FROM view_history
             WHERE user_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn clear(&self, user_id: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM search_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM view_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = %user_id, "History cleared");
        Ok(())
    }
}
