use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use unicode_normalization::UnicodeNormalization;

use super::{CatalogError, CatalogResult};
use crate::models::Movie;

const UNKNOWN: &str = "unknown";
const MAX_RATING: f64 = 10.0;

type RawRecord = HashMap<String, String>;

/// Which raw column feeds which field; exports differ between datasets
struct Columns {
    title: &'static str,
    genres: &'static str,
    rating: &'static str,
    has_release_date: bool,
    has_year: bool,
    text: Vec<&'static str>,
}

impl Columns {
    fn detect(headers: &[String]) -> CatalogResult<Self> {
        let has = |name: &str| headers.iter().any(|h| h == name);
        let pick = |preferred: &'static str, fallback: &'static str| {
            if has(preferred) {
                preferred
            } else {
                fallback
            }
        };

        let title = pick("original_title", "title");
        let genres = pick("genre", "genres");
        let candidates = [title, "overview", genres, "original_language"];
        let text: Vec<&'static str> = candidates.into_iter().filter(|c| has(c)).collect();

        if text.is_empty() {
            return Err(CatalogError::NoTextColumns(candidates.join(", ")));
        }

        Ok(Self {
            title,
            genres,
            rating: pick("vote_average", "rating"),
            has_release_date: has("release_date"),
            has_year: has("year"),
            text,
        })
    }
}

/// Folds accents to ASCII, collapses whitespace and lower-cases
pub fn normalize_text(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    ascii
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Turns a list literal such as `['Action', 'Adventure']` into `Action, Adventure`
pub fn parse_genres(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c| c == '[' || c == ']');
    let genres: Vec<&str> = trimmed
        .split(',')
        .map(|g| g.trim().trim_matches(|c| c == '\'' || c == '"'))
        .collect();

    match genres.first() {
        Some(first) if !first.is_empty() => genres.join(", "),
        _ => UNKNOWN.to_string(),
    }
}

fn text_or_unknown(record: &RawRecord, column: &str) -> String {
    match record.get(column).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn parse_number(value: Option<&String>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Cleans raw CSV records into catalog rows.
///
/// Missing text becomes "unknown", duplicate (title, release date) rows keep the
/// first occurrence, rating gaps are filled with the median of all raw ratings
/// and then clamped to 0-10, and years missing from both date and year columns are filled the same way.
pub fn clean_records(headers: &[String], records: Vec<RawRecord>) -> CatalogResult<Vec<Movie>> {
    let columns = Columns::detect(headers)?;

    // the fill comes from every raw rating, before dedupe and clamping
    let mut raw_ratings: Vec<f64> = records
        .iter()
        .filter_map(|record| parse_number(record.get(columns.rating)))
        .collect();
    let rating_fill = median(&mut raw_ratings).unwrap_or(0.0);

    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        let title = text_or_unknown(&record, columns.title);
        let release = record
            .get("release_date")
            .map(|d| d.trim().to_string())
            .unwrap_or_default();
        if seen.insert((title.clone(), release)) {
            kept.push((title, record));
        }
    }

    let mut movies: Vec<Movie> = kept
        .into_iter()
        .map(|(title, record)| {
            let rating = parse_number(record.get(columns.rating))
                .unwrap_or(rating_fill)
                .clamp(0.0, MAX_RATING);

            let genres = record
                .get(columns.genres)
                .map(|g| parse_genres(g.trim()))
                .unwrap_or_else(|| UNKNOWN.to_string());

            let combined = columns
                .text
                .iter()
                .map(|&col| {
                    if col == columns.genres {
                        genres.clone()
                    } else {
                        text_or_unknown(&record, col)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");

            let release_date = if columns.has_release_date {
                record.get("release_date").and_then(|d| parse_date(d))
            } else {
                None
            };
            let year = if columns.has_release_date {
                release_date.map(|d| d.year())
            } else if columns.has_year {
                parse_number(record.get("year")).map(|y| y.trunc() as i32)
            } else {
                None
            };

            Movie {
                id: parse_number(record.get("id")).map(|id| id.trunc() as i64),
                title,
                overview: text_or_unknown(&record, "overview"),
                genres,
                language: text_or_unknown(&record, "original_language"),
                rating,
                release_date,
                year,
                combined_text: normalize_text(&combined),
            }
        })
        .collect();

    let mut known_years: Vec<f64> = movies.iter().filter_map(|m| m.year.map(f64::from)).collect();
    if let Some(year_fill) = median(&mut known_years) {
        for movie in movies.iter_mut().filter(|m| m.year.is_none()) {
            movie.year = Some(year_fill.round() as i32);
        }
    }

    Ok(movies)
}
