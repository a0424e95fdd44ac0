//! Domain types shared by the enrichment pipeline and retrieval engines.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

pub type Meta = HashMap<String, String>;

/// A bounded span of source-document text, stored with its metadata and a
/// fixed-dimensionality embedding vector.
///
/// Passages are loaded once at index-build time and are read-only while
/// queries are served. Embedding length must match the corpus-wide dimension;
/// mismatched passages are rejected during corpus construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,
    #[serde(default)]
    pub metadata: Meta,
    pub embedding: Vec<f32>,
}

/// The output of the query enrichment pipeline.
///
/// `text` is the space-joined token stream with acronym expansions and
/// repeated boost tokens injected. `constraints` holds lowercase presence
/// terms; a passage must contain at least one of them to survive ranking.
/// Created once per incoming query and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedQuery {
    pub text: String,
    pub constraints: BTreeSet<String>,
}

impl EnrichedQuery {
    /// Wrap already-enriched text with no hard constraints.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into(), constraints: BTreeSet::new() }
    }
}

/// A ranked hit with its score components kept separate so a caller can show
/// why a result landed where it did.
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub passage: Arc<Passage>,
    pub fused_score: f32,
    pub lexical_score: f32,
    pub semantic_score: f32,
}

/// Metadata filter value: a single required value or an allow-list.
///
/// An empty string or empty list is a no-op (the filter is skipped).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaFilter {
    One(String),
    Any(Vec<String>),
}

impl MetaFilter {
    pub fn is_noop(&self) -> bool {
        match self {
            MetaFilter::One(v) => v.is_empty(),
            MetaFilter::Any(vs) => vs.is_empty(),
        }
    }

    /// Whether a passage metadata value satisfies this filter.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            MetaFilter::One(v) => value == v,
            MetaFilter::Any(vs) => vs.iter().any(|v| v == value),
        }
    }
}
