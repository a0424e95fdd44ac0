//! Query enrichment pipeline.
//!
//! Turns a raw natural-language claim into a retrieval-optimized query plus a
//! set of hard content constraints:
//!
//! 1. `normalize` strips patent legalese and collapses whitespace.
//! 2. `substitute` rewrites multi-word vocabulary phrases into their canonical
//!    short forms so they survive tokenization as single tokens.
//! 3. `enrich` tokenizes, drops stop-words, derives domain constraints,
//!    amplifies boost terms, and expands acronyms exactly-matched against the
//!    vocabulary.
//!
//! The composed [`ClaimPipeline`] is constructed once from immutable tables
//! and applied per query.

pub mod enrich;
pub mod normalize;
pub mod pipeline;
pub mod substitute;
pub mod vocab;

pub use enrich::TermEnricher;
pub use normalize::LegaleseNormalizer;
pub use pipeline::ClaimPipeline;
pub use substitute::PhraseSubstitutor;
pub use vocab::{BoostTermSet, DomainConstraintTable, Vocabulary};
