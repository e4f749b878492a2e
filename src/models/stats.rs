use serde::{Deserialize, Serialize};

/// Aggregate dataset used to populate the dashboard charts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StatsSnapshot {
    pub rating_distribution: RatingDistribution,
    pub genre_counts: GenreCounts,
    pub top_items: TopItems,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<Heatmap>,
}

/// Histogram of ratings; `bins` holds the edges, so it is one longer than `counts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RatingDistribution {
    pub bins: Vec<f64>,
    pub counts: Vec<u64>,
}

impl RatingDistribution {
    /// Labels of the form "2.0 - 3.0", one per bin
    pub fn bin_labels(&self) -> Vec<String> {
        self.bins
            .windows(2)
            .map(|edge| format!("{:.1} - {:.1}", edge[0], edge[1]))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GenreCounts {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TopItems {
    pub titles: Vec<String>,
    pub ratings: Vec<f64>,
}

/// Pairwise similarity between labels; `matrix[i][j]` pairs `labels[i]` and `labels[j]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Heatmap {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub matrix: Vec<Vec<f64>>,
}
