//! Movie catalog: loading the raw CSV export, cleaning it, and caching the
//! cleaned rows on disk so later starts skip the cleaning pass.

pub mod cleaner;
pub mod loader;

use std::path::Path;

use crate::models::Movie;

pub use cleaner::{clean_records, normalize_text, parse_genres};
pub use loader::{load_processed, load_raw, save_processed};

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Raw catalog not found: {0}")]
    MissingSource(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No text columns available (expected one of {0})")]
    NoTextColumns(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// The cleaned, immutable set of movies the recommender is fitted on
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// Loads the processed catalog if present, otherwise cleans the raw CSV
    /// and writes the processed copy for next time.
    pub fn ensure_processed(raw_path: &Path, processed_path: &Path) -> CatalogResult<Self> {
        if let Some(movies) = load_processed(processed_path)? {
            tracing::info!(
                path = %processed_path.display(),
                movies = movies.len(),
                "Loaded processed catalog"
            );
            return Ok(Self::new(movies));
        }

        let (headers, records) = load_raw(raw_path)?;
        let movies = clean_records(&headers, records)?;
        save_processed(processed_path, &movies)?;

        tracing::info!(
            raw = %raw_path.display(),
            processed = %processed_path.display(),
            movies = movies.len(),
            "Cleaned raw catalog"
        );

        Ok(Self::new(movies))
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
