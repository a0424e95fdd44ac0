//! Okapi BM25 with max-normalized scores.

use std::collections::HashMap;

use priorart_core::config::Bm25Settings;
use tracing::debug;

/// BM25 tuning parameters.
///
/// Negative IDF values (terms present in more than half the corpus) are
/// floored at `epsilon` times the average IDF, the Okapi convention, instead
/// of letting common terms subtract relevance.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
    pub epsilon: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75, epsilon: 0.25 }
    }
}

impl From<&Bm25Settings> for Bm25Params {
    fn from(s: &Bm25Settings) -> Self {
        Self { k1: s.k1, b: s.b, epsilon: s.epsilon }
    }
}

/// Term-frequency index over a fixed passage corpus.
///
/// Passages are tokenized at build time by lower-casing and
/// whitespace-splitting, matching how query text is tokenized at scoring
/// time. The index is immutable after construction.
pub struct Bm25Index {
    params: Bm25Params,
    /// Per-passage term frequencies.
    doc_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<f32>,
    avg_doc_len: f32,
    /// Per-term IDF with the epsilon floor already applied.
    idf: HashMap<String, f32>,
}

impl Bm25Index {
    pub fn build<S: AsRef<str>>(texts: &[S], params: Bm25Params) -> Self {
        let mut doc_freqs = Vec::with_capacity(texts.len());
        let mut doc_lens = Vec::with_capacity(texts.len());
        let mut term_doc_counts: HashMap<String, u32> = HashMap::new();

        for text in texts {
            let tokens = tokenize(text.as_ref());
            doc_lens.push(tokens.len() as f32);
            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *freqs.entry(token).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *term_doc_counts.entry(term.clone()).or_insert(0) += 1;
            }
            doc_freqs.push(freqs);
        }

        let n = texts.len() as f32;
        let avg_doc_len = if texts.is_empty() { 0.0 } else { doc_lens.iter().sum::<f32>() / n };
        let idf = compute_idf(&term_doc_counts, n, params.epsilon);
        debug!(passages = doc_freqs.len(), terms = idf.len(), "bm25 index built");

        Self { params, doc_freqs, doc_lens, avg_doc_len, idf }
    }

    pub fn len(&self) -> usize {
        self.doc_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_freqs.is_empty()
    }

    /// One relevance score per passage, linearly normalized to [0, 1] by the
    /// maximum observed score (no-op when every score is zero).
    ///
    /// Query tokens are deliberately NOT de-duplicated: the enrichment
    /// pipeline repeats boost tokens, and each repetition must contribute its
    /// full per-term score. This is how domain-term importance reaches an
    /// otherwise frequency-agnostic ranking function.
    pub fn scores(&self, query_text: &str) -> Vec<f32> {
        let mut scores = self.raw_scores(query_text);
        let max = scores.iter().cloned().fold(0.0f32, f32::max);
        if max > 0.0 {
            for s in &mut scores {
                *s /= max;
            }
        }
        scores
    }

    fn raw_scores(&self, query_text: &str) -> Vec<f32> {
        let query_tokens = tokenize(query_text);
        let mut scores = vec![0.0f32; self.doc_freqs.len()];
        if query_tokens.is_empty() {
            return scores;
        }

        for token in &query_tokens {
            let Some(&idf) = self.idf.get(token) else {
                continue;
            };
            for (i, freqs) in self.doc_freqs.iter().enumerate() {
                let tf = freqs.get(token).copied().unwrap_or(0) as f32;
                if tf == 0.0 {
                    continue;
                }
                let len_norm = 1.0 - self.params.b
                    + self.params.b * self.doc_lens[i] / self.avg_doc_len.max(1.0);
                scores[i] += idf * tf * (self.params.k1 + 1.0) / (tf + self.params.k1 * len_norm);
            }
        }
        scores
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn compute_idf(term_doc_counts: &HashMap<String, u32>, n: f32, epsilon: f32) -> HashMap<String, f32> {
    let mut idf: HashMap<String, f32> = HashMap::new();
    let mut negatives: Vec<String> = Vec::new();
    let mut idf_sum = 0.0f32;

    for (term, &df) in term_doc_counts {
        let value = ((n - df as f32 + 0.5) / (df as f32 + 0.5)).ln();
        idf_sum += value;
        if value < 0.0 {
            negatives.push(term.clone());
        }
        idf.insert(term.clone(), value);
    }

    if !idf.is_empty() {
        let floor = epsilon * (idf_sum / idf.len() as f32);
        for term in negatives {
            idf.insert(term, floor);
        }
    }
    idf
}
