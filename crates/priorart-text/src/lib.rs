//! priorart-text
//!
//! In-memory Okapi BM25 scoring over the passage corpus. The index is built
//! once from the corpus snapshot and serves concurrent queries without
//! locking.

pub mod bm25;

pub use bm25::{Bm25Index, Bm25Params};
