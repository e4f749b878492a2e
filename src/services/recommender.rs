use std::sync::Arc;

use crate::{
    catalog::{normalize_text, Catalog},
    models::{Movie, RecommendationItem},
    services::vectorizer::{SparseVector, TfidfVectorizer, VectorizerParams},
};

/// Content-based recommender over the catalog's combined text
pub struct ContentRecommender {
    catalog: Arc<Catalog>,
    vectorizer: TfidfVectorizer,
    matrix: Vec<SparseVector>,
}

impl ContentRecommender {
    /// Fits the vectorizer on every movie's combined text
    pub fn fit(catalog: Arc<Catalog>, params: VectorizerParams) -> Self {
        let corpus: Vec<&str> = catalog
            .movies()
            .iter()
            .map(|m| m.combined_text.as_str())
            .collect();
        let (vectorizer, matrix) = TfidfVectorizer::fit_transform(&corpus, params);

        Self {
            catalog,
            vectorizer,
            matrix,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    /// Ranks the whole catalog against a free-text query.
    ///
    /// `top_k` is clamped to `1..=catalog size`; an empty catalog yields no results.
    pub fn recommend(&self, query: &str, top_k: i64) -> Vec<RecommendationItem> {
        let query_vec = self.vectorizer.transform(&normalize_text(query));
        self.rank(&query_vec, top_k)
            .into_iter()
            .filter_map(|(index, score)| {
                self.catalog
                    .get(index)
                    .map(|movie| to_item(index, movie, score))
            })
            .collect()
    }

    /// `(row index, similarity)` pairs, best first; ties keep catalog order
    pub fn rank(&self, query_vec: &SparseVector, top_k: i64) -> Vec<(usize, f64)> {
        if self.matrix.is_empty() {
            return Vec::new();
        }
        let k = top_k.clamp(1, self.matrix.len() as i64) as usize;

        let mut scored: Vec<(usize, f64)> = self
            .matrix
            .iter()
            .enumerate()
            .map(|(index, row)| (index, query_vec.dot(row)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        scored
    }
}

fn to_item(index: usize, movie: &Movie, score: f64) -> RecommendationItem {
    RecommendationItem {
        id: movie.id.unwrap_or(index as i64),
        title: movie.title.clone(),
        genres: movie.genres.clone(),
        rating: movie.rating,
        overview: Some(movie.overview.clone()),
        release_date: movie.release_date.map(|d| d.format("%Y-%m-%d").to_string()),
        year: movie.year,
        score,
    }
}
