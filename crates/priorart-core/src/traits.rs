//! Capability seams between the retrieval engine and its collaborators.

/// Produces a query embedding of the corpus's fixed dimensionality.
///
/// Implementations may call an external model service or compute a
/// deterministic stub vector. The engine tolerates failure: an `Err` from
/// `embed_query` degrades the search to lexical-only scoring instead of
/// aborting it.
pub trait QueryEmbedder: Send + Sync {
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Compute a single embedding for the given query text.
    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}
