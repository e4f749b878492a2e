use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{CatalogError, CatalogResult};
use crate::models::Movie;

/// Reads the raw export into header names plus one map per row.
///
/// Malformed rows are skipped with a warning rather than failing the load.
pub fn load_raw(path: &Path) -> CatalogResult<(Vec<String>, Vec<HashMap<String, String>>)> {
    if !path.exists() {
        return Err(CatalogError::MissingSource(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        match result {
            Ok(record) => {
                let row = headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                records.push(row);
            }
            Err(e) => {
                skipped += 1;
                tracing::debug!(error = %e, "Skipping malformed catalog row");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, path = %path.display(), "Skipped malformed catalog rows");
    }

    Ok((headers, records))
}

/// Loads the cleaned catalog, or `None` when it has not been written yet
pub fn load_processed(path: &Path) -> CatalogResult<Option<Vec<Movie>>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let movies = reader
        .deserialize::<Movie>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(movies))
}

pub fn save_processed(path: &Path, movies: &[Movie]) -> CatalogResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for movie in movies {
        writer.serialize(movie)?;
    }
    writer.flush()?;
    Ok(())
}
