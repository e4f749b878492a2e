use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result count used when the request carries none or an unusable one
pub const DEFAULT_TOP_K: i64 = 10;

/// A scored candidate movie returned for a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub id: i64,
    pub title: String,
    pub genres: String,
    /// 0-10
    pub rating: f64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Cosine similarity to the query, 0-1
    pub score: f64,
}

impl RecommendationItem {
    /// Year shown next to the item: taken from the release date when it parses,
    /// otherwise the standalone year
    pub fn display_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
            .or(self.year)
    }
}

/// Body of `POST /api/recommend`
///
/// `top_k` is kept as a raw JSON value so that strings, floats and garbage can
/// all be coerced the same way the web form does.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub top_k: Value,
}

impl RecommendRequest {
    pub fn new(query: impl Into<String>, top_k: i64) -> Self {
        Self {
            query: query.into(),
            top_k: Value::from(top_k),
        }
    }

    /// Requested result count before clamping to the catalog size
    pub fn requested_top_k(&self) -> i64 {
        match &self.top_k {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(DEFAULT_TOP_K),
            Value::String(s) => s.trim().parse().unwrap_or(DEFAULT_TOP_K),
            _ => DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendResponse {
    #[serde(default)]
    pub results: Vec<RecommendationItem>,
}
