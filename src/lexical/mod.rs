//! Layer 1: lexical TF-IDF index over corpus documents.
//!
//! Catches verbatim and near-verbatim copies without touching the embedding
//! model. The index is a sparse term-weighted matrix (unigrams + bigrams,
//! capped vocabulary) built once at startup; scoring a query is a sparse
//! cosine against every document row.
//!
//! An empty corpus produces no index ([`LexicalIndex::build`] returns
//! `None`); the cascade then simply skips this layer.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use tracing::info;

use crate::constants::LEXICAL_MAX_FEATURES;

/// Best lexical match for a query sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalScore {
    /// Cosine similarity in `[0, 1]` against the best-scoring document.
    pub score: f32,
    /// Source id of the best-scoring document (empty when score is 0).
    pub source_id: String,
}

impl LexicalScore {
    fn zero() -> Self {
        Self {
            score: 0.0,
            source_id: String::new(),
        }
    }
}

/// Sparse TF-IDF index over full corpus documents.
pub struct LexicalIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    // One sparse L2-normalized row per document, term ids ascending.
    rows: Vec<Vec<(usize, f32)>>,
    source_ids: Vec<String>,
}

impl std::fmt::Debug for LexicalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexicalIndex")
            .field("documents", &self.rows.len())
            .field("vocabulary", &self.vocabulary.len())
            .finish()
    }
}

impl LexicalIndex {
    /// Builds the index from `(source_id, full_text)` documents.
    ///
    /// Returns `None` when the corpus is empty or contains no usable terms;
    /// the caller treats that as "layer not ready", not as an error.
    pub fn build(documents: &[(String, String)]) -> Option<Self> {
        if documents.is_empty() {
            return None;
        }

        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|(_, text)| extract_terms(text))
            .collect();

        let vocabulary = select_vocabulary(&tokenized, LEXICAL_MAX_FEATURES);
        if vocabulary.is_empty() {
            return None;
        }

        // Smoothed idf, sklearn-style: ln((1 + n) / (1 + df)) + 1.
        let n_docs = documents.len() as f32;
        let mut document_frequency = vec![0u32; vocabulary.len()];
        for terms in &tokenized {
            let mut seen = vec![false; vocabulary.len()];
            for term in terms {
                if let Some(&id) = vocabulary.get(term) {
                    if !seen[id] {
                        seen[id] = true;
                        document_frequency[id] += 1;
                    }
                }
            }
        }
        let idf: Vec<f32> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let rows: Vec<Vec<(usize, f32)>> = tokenized
            .iter()
            .map(|terms| weigh(terms, &vocabulary, &idf))
            .collect();

        let source_ids = documents.iter().map(|(id, _)| id.clone()).collect();

        let index = Self {
            vocabulary,
            idf,
            rows,
            source_ids,
        };

        info!(
            documents = index.rows.len(),
            vocabulary = index.vocabulary.len(),
            "Lexical index ready"
        );

        Some(index)
    }

    /// Scores a query sentence against every indexed document.
    ///
    /// Returns the maximum cosine similarity and the matching source id;
    /// `(0.0, "")` when the query shares no vocabulary with the corpus.
    pub fn score(&self, query: &str) -> LexicalScore {
        let terms = extract_terms(query);
        let query_vec = weigh(&terms, &self.vocabulary, &self.idf);
        if query_vec.is_empty() {
            return LexicalScore::zero();
        }

        let mut best = LexicalScore::zero();
        for (row, source_id) in self.rows.iter().zip(&self.source_ids) {
            let similarity = sparse_dot(&query_vec, row);
            if similarity > best.score {
                best = LexicalScore {
                    score: similarity,
                    source_id: source_id.clone(),
                };
            }
        }
        best
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no documents are indexed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lowercased unigrams + bigrams with stop words removed.
fn extract_terms(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !is_stop_word(w))
        .collect();

    let mut terms = Vec::with_capacity(words.len() * 2);
    for word in &words {
        terms.push((*word).to_string());
    }
    for pair in words.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

/// Keeps the `max_features` most frequent terms across the corpus.
fn select_vocabulary(tokenized: &[Vec<String>], max_features: usize) -> HashMap<String, usize> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for terms in tokenized {
        for term in terms {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_features);

    ranked
        .into_iter()
        .enumerate()
        .map(|(id, (term, _))| (term.to_string(), id))
        .collect()
}

/// TF-IDF weights for one token stream, L2-normalized, term ids ascending.
fn weigh(
    terms: &[String],
    vocabulary: &HashMap<String, usize>,
    idf: &[f32],
) -> Vec<(usize, f32)> {
    let mut tf: HashMap<usize, f32> = HashMap::new();
    for term in terms {
        if let Some(&id) = vocabulary.get(term) {
            *tf.entry(id).or_insert(0.0) += 1.0;
        }
    }
    if tf.is_empty() {
        return Vec::new();
    }

    let mut weighted: Vec<(usize, f32)> = tf
        .into_iter()
        .map(|(id, count)| (id, count * idf[id]))
        .collect();
    weighted.sort_by_key(|(id, _)| *id);

    let norm: f32 = weighted.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut weighted {
            *w /= norm;
        }
    }
    weighted
}

/// Dot product of two sparse vectors sorted by term id.
fn sparse_dot(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
        "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by",
        "from", "as", "into", "through", "during", "before", "after", "above", "below", "between",
        "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
        "only", "own", "same", "so", "than", "too", "very", "just", "and", "but", "if", "or",
        "because", "until", "while", "what", "which", "who", "whom", "this", "that", "these",
        "those", "am", "it", "its",
    ];
    STOP_WORDS.contains(&word)
}
