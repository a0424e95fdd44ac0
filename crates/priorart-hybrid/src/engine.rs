//! Score fusion, filtering, and ranking.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use priorart_core::traits::QueryEmbedder;
use priorart_core::types::{EnrichedQuery, MetaFilter, ScoredResult};
use tracing::{debug, warn};

use crate::snapshot::CorpusIndex;

/// Sentinel fused score marking an excluded passage. Valid fused scores
/// before phrase boosting lie in [0, 1], so anything at or below this value
/// never reaches the caller.
pub const EXCLUDED: f32 = -1.0;

/// Additive bonus per quoted phrase found verbatim in a passage.
const PHRASE_BONUS: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub top_k: usize,
    /// Blend weight: 0.0 = pure lexical, 1.0 = pure semantic.
    pub alpha: f32,
    pub filters: HashMap<String, MetaFilter>,
    /// Quoted phrases from the original query; each match adds a fixed bonus
    /// that can dominate ranking regardless of `alpha`.
    pub quoted_phrases: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { top_k: 10, alpha: 0.5, filters: HashMap::new(), quoted_phrases: Vec::new() }
    }
}

/// Ranked results plus an optional degradation note (e.g. the embedding
/// provider failed and scoring fell back to lexical-only).
#[derive(Debug, Default)]
pub struct SearchResponse {
    pub results: Vec<ScoredResult>,
    pub degradation: Option<String>,
}

/// The hybrid retrieval engine.
///
/// Holds an atomically swappable corpus snapshot and a query-embedding
/// provider. `search` is stateless per call and safe to run from any number
/// of threads concurrently with `reindex`.
pub struct HybridSearchEngine {
    corpus: RwLock<Arc<CorpusIndex>>,
    embedder: Box<dyn QueryEmbedder>,
}

impl HybridSearchEngine {
    pub fn new(corpus: CorpusIndex, embedder: Box<dyn QueryEmbedder>) -> Self {
        Self { corpus: RwLock::new(Arc::new(corpus)), embedder }
    }

    /// Replace the served corpus. In-flight searches keep the snapshot they
    /// started with.
    pub fn reindex(&self, corpus: CorpusIndex) {
        let corpus = Arc::new(corpus);
        match self.corpus.write() {
            Ok(mut guard) => *guard = corpus,
            Err(poisoned) => *poisoned.into_inner() = corpus,
        }
    }

    fn snapshot(&self) -> Arc<CorpusIndex> {
        match self.corpus.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Distinct metadata values for a key across the current snapshot.
    pub fn metadata_values(&self, key: &str) -> Vec<String> {
        self.snapshot().metadata_values(key)
    }

    pub fn corpus_len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn search(&self, query: &EnrichedQuery, opts: &SearchOptions) -> SearchResponse {
        let corpus = self.snapshot();
        if corpus.is_empty() {
            return SearchResponse::default();
        }

        let alpha = if (0.0..=1.0).contains(&opts.alpha) {
            opts.alpha
        } else {
            warn!(alpha = opts.alpha, "alpha outside [0, 1], clamping");
            opts.alpha.clamp(0.0, 1.0)
        };

        let lexical = corpus.bm25().scores(&query.text);
        let (semantic, degradation) = self.semantic_scores(&corpus, &query.text);

        let mut fused: Vec<f32> = lexical
            .iter()
            .zip(&semantic)
            .map(|(&lex, &sem)| (1.0 - alpha) * lex + alpha * sem)
            .collect();

        self.apply_metadata_filters(&corpus, &opts.filters, &mut fused);
        self.apply_constraints(&corpus, query, &mut fused);
        self.apply_phrase_boosts(&corpus, &opts.quoted_phrases, &mut fused);

        let mut order: Vec<usize> = (0..fused.len()).collect();
        // Deterministic: fused score descending, passage index ascending.
        order.sort_by(|&a, &b| {
            fused[b].partial_cmp(&fused[a]).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
        });

        let results = order
            .into_iter()
            .filter(|&i| fused[i] > EXCLUDED)
            .take(opts.top_k)
            .map(|i| ScoredResult {
                passage: Arc::clone(&corpus.passages()[i]),
                fused_score: fused[i],
                lexical_score: lexical[i],
                semantic_score: semantic[i],
            })
            .collect();

        SearchResponse { results, degradation }
    }

    /// Cosine scores for every passage, or all-zero on embedding failure so a
    /// broken provider degrades the search to lexical-only instead of
    /// aborting it.
    fn semantic_scores(&self, corpus: &CorpusIndex, text: &str) -> (Vec<f32>, Option<String>) {
        let zeros = vec![0.0f32; corpus.len()];
        match self.embedder.embed_query(text) {
            Ok(vector) => match corpus.semantic().scores(&vector) {
                Ok(scores) if scores.len() == corpus.len() => (scores, None),
                // A degraded or zero-dimension semantic index can produce
                // fewer scores than passages; every downstream pass indexes
                // by passage position, so pad out to lexical-only.
                Ok(scores) => {
                    warn!(
                        scores = scores.len(),
                        passages = corpus.len(),
                        "semantic score count mismatch, falling back to lexical-only"
                    );
                    (zeros, Some("semantic score count mismatch".to_string()))
                }
                Err(e) => {
                    warn!(error = %e, "semantic scoring failed, falling back to lexical-only");
                    (zeros, Some(format!("semantic scoring failed: {e}")))
                }
            },
            Err(e) => {
                warn!(error = %e, "query embedding failed, falling back to lexical-only");
                (zeros, Some(format!("query embedding failed: {e}")))
            }
        }
    }

    /// Hard gate: a passage survives only if every non-empty filter accepts
    /// its metadata value. A missing key counts as a mismatch.
    fn apply_metadata_filters(
        &self,
        corpus: &CorpusIndex,
        filters: &HashMap<String, MetaFilter>,
        fused: &mut [f32],
    ) {
        let active: Vec<(&String, &MetaFilter)> =
            filters.iter().filter(|(_, f)| !f.is_noop()).collect();
        if active.is_empty() {
            return;
        }
        for (i, passage) in corpus.passages().iter().enumerate() {
            let keep = active.iter().all(|(key, filter)| {
                passage.metadata.get(key.as_str()).is_some_and(|value| filter.accepts(value))
            });
            if !keep {
                fused[i] = EXCLUDED;
            }
        }
    }

    /// Hard gate: with a non-empty constraint set, a surviving passage must
    /// contain at least one constraint term. Matching is an unanchored
    /// case-insensitive substring check.
    fn apply_constraints(&self, corpus: &CorpusIndex, query: &EnrichedQuery, fused: &mut [f32]) {
        if query.constraints.is_empty() {
            return;
        }
        let mut excluded = 0usize;
        for (i, text) in corpus.lowered().iter().enumerate() {
            if fused[i] <= EXCLUDED {
                continue;
            }
            if !query.constraints.iter().any(|term| text.contains(term.as_str())) {
                fused[i] = EXCLUDED;
                excluded += 1;
            }
        }
        debug!(excluded, constraints = query.constraints.len(), "constraint gate applied");
    }

    fn apply_phrase_boosts(&self, corpus: &CorpusIndex, phrases: &[String], fused: &mut [f32]) {
        for phrase in phrases {
            let phrase = phrase.to_lowercase();
            if phrase.is_empty() {
                continue;
            }
            for (i, text) in corpus.lowered().iter().enumerate() {
                if fused[i] > EXCLUDED && text.contains(&phrase) {
                    fused[i] += PHRASE_BONUS;
                }
            }
        }
    }
}

/// Extract double-quoted phrases from the original query text, lowercased.
/// An unmatched trailing quote is ignored.
pub fn extract_quoted_phrases(raw: &str) -> Vec<String> {
    let parts: Vec<&str> = raw.split('"').collect();
    let mut phrases = Vec::new();
    // Odd-indexed pieces sit between a quote pair; a final odd piece with no
    // closing quote is dropped.
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 1 && i < parts.len() - 1 {
            let phrase = part.trim();
            if !phrase.is_empty() {
                phrases.push(phrase.to_lowercase());
            }
        }
    }
    phrases
}
