//! TF-IDF text vectorizer.
//!
//! Tokens are runs of two or more word characters, lower-cased, with English
//! stop words removed. Features are unigrams plus bigrams; terms seen in fewer
//! than `min_df` documents are dropped and the vocabulary is capped at
//! `max_features` by corpus frequency. Inverse document frequency is smoothed,
//! `ln((1 + n) / (1 + df)) + 1`, and every vector is l2-normalized, so the dot
//! product of two vectors is their cosine similarity.

use std::collections::{HashMap, HashSet};

use super::stop_words::ENGLISH_STOP_WORDS;

#[derive(Debug, Clone, Copy)]
pub struct VectorizerParams {
    pub max_features: usize,
    pub min_df: usize,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            max_features: 6000,
            min_df: 2,
        }
    }
}

/// Sparse row: `(feature index, weight)` sorted by index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector(Vec<(usize, f64)>);

impl SparseVector {
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.0.len() && j < other.0.len() {
            let (a_idx, a_val) = self.0[i];
            let (b_idx, b_val) = other.0[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_val * b_val;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.0.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    stop_words: HashSet<&'static str>,
}

fn tokenize(text: &str, stop_words: &HashSet<&'static str>) -> Vec<String> {
    let lowered = text.to_lowercase();
    let unigrams: Vec<String> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| !stop_words.contains(*t))
        .map(str::to_string)
        .collect();

    let bigrams: Vec<String> = unigrams
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();

    unigrams.into_iter().chain(bigrams).collect()
}

fn term_counts(tokens: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

impl TfidfVectorizer {
    /// Learns the vocabulary and idf weights, returning the fitted vectorizer
    /// together with the document matrix
    pub fn fit_transform<S: AsRef<str>>(
        corpus: &[S],
        params: VectorizerParams,
    ) -> (Self, Vec<SparseVector>) {
        let stop_words: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
        let documents: Vec<HashMap<String, usize>> = corpus
            .iter()
            .map(|doc| term_counts(tokenize(doc.as_ref(), &stop_words)))
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<&str, usize> = HashMap::new();
        for doc in &documents {
            for (term, count) in doc {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                *corpus_frequency.entry(term.as_str()).or_insert(0) += count;
            }
        }

        let mut terms: Vec<&str> = document_frequency
            .iter()
            .filter(|(_, df)| **df >= params.min_df)
            .map(|(&term, _)| term)
            .collect();

        if terms.len() > params.max_features {
            terms.sort_by(|a, b| corpus_frequency[b].cmp(&corpus_frequency[a]).then(a.cmp(b)));
            terms.truncate(params.max_features);
        }
        terms.sort_unstable();

        let n = documents.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|term| ((1.0 + n) / (1.0 + document_frequency[term] as f64)).ln() + 1.0)
            .collect();
        let vocabulary: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let vectorizer = Self {
            vocabulary,
            idf,
            stop_words,
        };
        let matrix = documents
            .iter()
            .map(|counts| vectorizer.weigh(counts))
            .collect();

        tracing::info!(
            documents = corpus.len(),
            features = vectorizer.vocabulary.len(),
            "Fitted TF-IDF vectorizer"
        );

        (vectorizer, matrix)
    }

    /// Projects new text onto the fitted vocabulary
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&term_counts(tokenize(text, &self.stop_words)))
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn weigh(&self, counts: &HashMap<String, usize>) -> SparseVector {
        let mut weights: Vec<(usize, f64)> = counts
            .iter()
            .filter_map(|(term, &count)| {
                self.vocabulary
                    .get(term)
                    .map(|&index| (index, count as f64 * self.idf[index]))
            })
            .collect();
        weights.sort_unstable_by_key(|(index, _)| *index);

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in weights.iter_mut() {
                *w /= norm;
            }
        }
        SparseVector(weights)
    }
}
