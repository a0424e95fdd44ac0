//! priorart-hybrid
//!
//! The hybrid retrieval engine: fuses lexical (BM25) and semantic (cosine)
//! scores for every passage, applies metadata filters and hard content
//! constraints, boosts quoted phrases, and returns an explainable top-K.
//!
//! The corpus snapshot is immutable; `reindex` swaps it atomically so
//! in-flight searches always see a consistent corpus.

pub mod engine;
pub mod snapshot;

pub use engine::{
    extract_quoted_phrases, HybridSearchEngine, SearchOptions, SearchResponse, EXCLUDED,
};
pub use snapshot::CorpusIndex;
