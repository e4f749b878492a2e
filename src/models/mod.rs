pub mod history;
pub mod movie;
pub mod recommendation;
pub mod stats;

pub use history::{HistorySnapshot, MovieId, SearchEntry, ViewEntry, ViewRecord};
pub use movie::Movie;
pub use recommendation::{RecommendRequest, RecommendResponse, RecommendationItem, DEFAULT_TOP_K};
pub use stats::{GenreCounts, Heatmap, RatingDistribution, StatsSnapshot, TopItems};
