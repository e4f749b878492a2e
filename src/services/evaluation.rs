use std::collections::HashSet;

use serde::Serialize;

use crate::services::{metrics, recommender::ContentRecommender};

/// Offline quality report for the recommender
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluationReport {
    /// Error of predicting every rating as the global mean
    pub baseline_mae: f64,
    pub baseline_rmse: f64,
    pub k: usize,
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    /// Number of movies used as queries
    pub evaluated: usize,
}

/// Evenly spaced row indices; the whole catalog when `sample` is `None` or too large
fn sample_indices(len: usize, sample: Option<usize>) -> Vec<usize> {
    match sample {
        Some(n) if n > 0 && n < len => (0..n).map(|i| i * len / n).collect(),
        _ => (0..len).collect(),
    }
}

/// Scores the recommender with genre-overlap relevance.
///
/// Each sampled movie's own text is the query; a result counts as relevant when
/// it shares at least one genre with the query movie, and the movie itself is
/// excluded from its own results.
pub fn evaluate(recommender: &ContentRecommender, k: usize, sample: Option<usize>) -> EvaluationReport {
    let movies = recommender.catalog().movies();

    let actual: Vec<f64> = movies.iter().map(|m| m.rating).collect();
    let mean = if actual.is_empty() {
        0.0
    } else {
        actual.iter().sum::<f64>() / actual.len() as f64
    };
    let predicted = vec![mean; actual.len()];

    let genre_sets: Vec<HashSet<&str>> = movies.iter().map(|m| m.genre_list().collect()).collect();
    let indices = sample_indices(movies.len(), sample);

    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;
    for &i in &indices {
        let relevant: HashSet<String> = movies
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i && !genre_sets[i].is_disjoint(&genre_sets[*j]))
            .map(|(_, m)| m.title.clone())
            .collect();

        let query = recommender.vectorizer().transform(&movies[i].combined_text);
        let recommended: Vec<String> = recommender
            .rank(&query, k as i64 + 1)
            .into_iter()
            .map(|(index, _)| movies[index].title.clone())
            .filter(|title| *title != movies[i].title)
            .take(k)
            .collect();

        precision_sum += metrics::precision_at_k(&relevant, &recommended, k);
        recall_sum += metrics::recall_at_k(&relevant, &recommended, k);
    }

    let evaluated = indices.len();
    let average = |sum: f64| if evaluated == 0 { 0.0 } else { sum / evaluated as f64 };

    let report = EvaluationReport {
        baseline_mae: metrics::mae(&actual, &predicted),
        baseline_rmse: metrics::rmse(&actual, &predicted),
        k,
        precision_at_k: average(precision_sum),
        recall_at_k: average(recall_sum),
        evaluated,
    };

    tracing::info!(
        k,
        evaluated,
        precision = report.precision_at_k,
        recall = report.recall_at_k,
        "Evaluation finished"
    );

    report
}
