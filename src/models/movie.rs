use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cleaned catalog row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Source id; not every dataset carries one
    pub id: Option<i64>,
    pub title: String,
    pub overview: String,
    /// Comma separated, e.g. "Action, Adventure"
    pub genres: String,
    pub language: String,
    /// Clamped to 0-10
    pub rating: f64,
    pub release_date: Option<NaiveDate>,
    pub year: Option<i32>,
    /// Normalized text the vectorizer is fitted on
    pub combined_text: String,
}

impl Movie {
    /// Individual genre labels, trimmed, empties dropped
    pub fn genre_list(&self) -> impl Iterator<Item = &str> {
        self.genres.split(',').map(str::trim).filter(|g| !g.is_empty())
    }
}
