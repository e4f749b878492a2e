pub mod evaluation;
pub mod metrics;
pub mod recommender;
pub mod stop_words;
pub mod vectorizer;

pub use evaluation::{evaluate, EvaluationReport};
pub use metrics::build_stats;
pub use recommender::ContentRecommender;
pub use vectorizer::{SparseVector, TfidfVectorizer, VectorizerParams};
