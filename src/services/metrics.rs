use std::collections::{HashMap, HashSet};

use crate::{
    catalog::Catalog,
    models::{GenreCounts, Heatmap, Movie, RatingDistribution, StatsSnapshot, TopItems},
};

pub const RATING_BINS: usize = 10;
pub const MAX_RATING: f64 = 10.0;
pub const TOP_GENRES: usize = 15;
pub const TOP_ITEMS: usize = 15;
pub const HEATMAP_GENRES: usize = 8;

/// Everything the dashboard needs, computed in one pass over the catalog
pub fn build_stats(catalog: &Catalog) -> StatsSnapshot {
    let movies = catalog.movies();
    StatsSnapshot {
        rating_distribution: rating_distribution(movies, RATING_BINS),
        genre_counts: genre_frequency(movies, TOP_GENRES),
        top_items: top_items(movies, TOP_ITEMS),
        heatmap: genre_similarity(movies, HEATMAP_GENRES),
    }
}

/// Equal-width histogram over `[0, MAX_RATING]`; the last bin includes its
/// right edge and values outside the range are ignored
pub fn rating_distribution(movies: &[Movie], bins: usize) -> RatingDistribution {
    let bins = bins.max(1);
    let width = MAX_RATING / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| i as f64 * width).collect();

    let mut counts = vec![0u64; bins];
    for rating in movies.iter().map(|m| m.rating) {
        if !(0.0..=MAX_RATING).contains(&rating) {
            continue;
        }
        let bin = ((rating / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }

    RatingDistribution {
        bins: edges,
        counts,
    }
}

/// Sorted label/count pairs for every genre, most frequent first
fn genre_tally(movies: &[Movie]) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for genre in movies.iter().flat_map(Movie::genre_list) {
        *counts.entry(genre).or_insert(0) += 1;
    }

    let mut tally: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(genre, count)| (genre.to_string(), count))
        .collect();
    tally.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tally
}

pub fn genre_frequency(movies: &[Movie], top_n: usize) -> GenreCounts {
    let (labels, counts) = genre_tally(movies).into_iter().take(top_n).unzip();
    GenreCounts { labels, counts }
}

/// Highest rated movies; equal ratings keep catalog order
pub fn top_items(movies: &[Movie], top_n: usize) -> TopItems {
    let mut ranked: Vec<&Movie> = movies.iter().collect();
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    let (titles, ratings) = ranked
        .into_iter()
        .take(top_n)
        .map(|m| (m.title.clone(), m.rating))
        .unzip();
    TopItems { titles, ratings }
}

/// Jaccard similarity between the movie sets of the most frequent genres.
///
/// Returns `None` when the catalog has no genres at all.
pub fn genre_similarity(movies: &[Movie], top_n: usize) -> Option<Heatmap> {
    let labels: Vec<String> = genre_tally(movies)
        .into_iter()
        .take(top_n)
        .map(|(label, _)| label)
        .collect();
    if labels.is_empty() {
        return None;
    }

    let members: Vec<HashSet<usize>> = labels
        .iter()
        .map(|label| {
            movies
                .iter()
                .enumerate()
                .filter(|(_, m)| m.genre_list().any(|g| g == label))
                .map(|(index, _)| index)
                .collect()
        })
        .collect();

    let matrix = members
        .iter()
        .map(|a| {
            members
                .iter()
                .map(|b| {
                    let union = a.union(b).count();
                    if union == 0 {
                        0.0
                    } else {
                        a.intersection(b).count() as f64 / union as f64
                    }
                })
                .collect()
        })
        .collect();

    Some(Heatmap { labels, matrix })
}

pub fn precision_at_k(relevant: &HashSet<String>, recommended: &[String], k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = recommended.iter().take(k).filter(|item| relevant.contains(*item)).count();
    hits as f64 / k as f64
}

pub fn recall_at_k(relevant: &HashSet<String>, recommended: &[String], k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let hits = recommended.iter().take(k).filter(|item| relevant.contains(*item)).count();
    hits as f64 / relevant.len() as f64
}

pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    mse.sqrt()
}
