//! Immutable corpus snapshot: passages plus their lexical and semantic
//! indexes, built once and shared read-only across concurrent searches.

use std::sync::Arc;

use priorart_core::types::Passage;
use priorart_text::{Bm25Index, Bm25Params};
use priorart_vector::SemanticIndex;
use tracing::{info, warn};

pub struct CorpusIndex {
    passages: Vec<Arc<Passage>>,
    /// Lowercased passage text, for constraint and phrase containment checks.
    lowered: Vec<String>,
    bm25: Bm25Index,
    semantic: SemanticIndex,
    dim: usize,
}

impl CorpusIndex {
    /// Build a snapshot from loaded passages.
    ///
    /// The corpus dimension is `expected_dim` when given (configuration), or
    /// inferred from the first passage. Any passage whose embedding length
    /// differs is rejected here, at load time, rather than surfacing as a
    /// shape error during scoring — strict variant: the passage is dropped
    /// from the corpus altogether, not just from the semantic index.
    pub fn build(passages: Vec<Passage>, expected_dim: Option<usize>, params: Bm25Params) -> Self {
        let dim = expected_dim
            .filter(|&d| d > 0)
            .or_else(|| passages.first().map(|p| p.embedding.len()))
            .unwrap_or(0);

        let mut kept: Vec<Arc<Passage>> = Vec::with_capacity(passages.len());
        let mut rejected = 0usize;
        for passage in passages {
            if passage.embedding.len() == dim {
                kept.push(Arc::new(passage));
            } else {
                rejected += 1;
            }
        }
        if rejected > 0 {
            warn!(rejected, dim, "rejected passages with mismatched embedding length");
        }

        let lowered: Vec<String> = kept.iter().map(|p| p.text.to_lowercase()).collect();
        let texts: Vec<&str> = kept.iter().map(|p| p.text.as_str()).collect();
        let bm25 = Bm25Index::build(&texts, params);
        let embeddings: Vec<Vec<f32>> = kept.iter().map(|p| p.embedding.clone()).collect();
        // Cannot fail after the length gate above, but never panic here.
        let semantic = SemanticIndex::build(&embeddings, dim).unwrap_or_else(|e| {
            warn!(error = %e, "semantic index build failed, serving lexical-only corpus");
            SemanticIndex::empty(dim)
        });

        info!(passages = kept.len(), dim, "corpus snapshot built");
        Self { passages: kept, lowered, bm25, semantic, dim }
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn passages(&self) -> &[Arc<Passage>] {
        &self.passages
    }

    pub(crate) fn lowered(&self) -> &[String] {
        &self.lowered
    }

    pub(crate) fn bm25(&self) -> &Bm25Index {
        &self.bm25
    }

    pub(crate) fn semantic(&self) -> &SemanticIndex {
        &self.semantic
    }

    /// Distinct metadata values observed for a key, sorted.
    pub fn metadata_values(&self, key: &str) -> Vec<String> {
        self.passages
            .iter()
            .filter_map(|p| p.metadata.get(key).cloned())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
