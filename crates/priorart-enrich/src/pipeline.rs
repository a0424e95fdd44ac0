//! The composed query enrichment pipeline.

use priorart_core::config::EnrichSettings;
use priorart_core::types::EnrichedQuery;
use tracing::debug;

use crate::enrich::TermEnricher;
use crate::normalize::LegaleseNormalizer;
use crate::substitute::PhraseSubstitutor;
use crate::vocab::{BoostTermSet, DomainConstraintTable, Vocabulary};

/// raw claim text → normalized → phrase-substituted → enriched query.
///
/// Constructed once from immutable tables; `process` is stateless and may be
/// called from any number of threads.
pub struct ClaimPipeline {
    normalizer: LegaleseNormalizer,
    substitutor: PhraseSubstitutor,
    enricher: TermEnricher,
}

impl ClaimPipeline {
    pub fn new(
        vocab: Vocabulary,
        constraints: DomainConstraintTable,
        boosts: BoostTermSet,
        settings: EnrichSettings,
    ) -> Self {
        let substitutor = PhraseSubstitutor::new(&vocab);
        Self {
            normalizer: LegaleseNormalizer::new(),
            substitutor,
            enricher: TermEnricher::new(vocab, constraints, boosts, settings),
        }
    }

    pub fn process(&self, raw: &str) -> EnrichedQuery {
        let normalized = self.normalizer.normalize(raw);
        let substituted = self.substitutor.substitute(&normalized);
        debug!(%normalized, %substituted, "claim pipeline stages");
        self.enricher.enrich(&substituted)
    }
}
