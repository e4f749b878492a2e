use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A past search, as returned by `GET /api/history`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct SearchEntry {
    pub query: String,
    #[serde(default)]
    pub top_k: i64,
    pub result_count: i64,
    pub timestamp: DateTime<Utc>,
}

/// A movie the user opened from the result list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ViewEntry {
    #[serde(default)]
    pub movie_id: String,
    pub title: String,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Both history lists, newest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HistorySnapshot {
    #[serde(default)]
    pub searches: Vec<SearchEntry>,
    #[serde(default)]
    pub views: Vec<ViewEntry>,
}

/// Movie ids arrive as numbers from the recommender but are stored as text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum MovieId {
    Number(i64),
    Text(String),
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieId::Number(id) => write!(f, "{}", id),
            MovieId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Body of `POST /api/history/view`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewRecord {
    pub movie_id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}
