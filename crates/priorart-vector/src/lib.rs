//! priorart-vector
//!
//! Cosine-similarity scoring over the corpus embedding matrix, plus the
//! query-embedding providers (`embed_provider`). Passage vectors are
//! L2-normalized once at index build; query vectors per call.

pub mod embed_provider;
pub mod score;

pub use score::SemanticIndex;
