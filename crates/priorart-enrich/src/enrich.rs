//! Token-level enrichment: stop-word removal, constraint derivation, boost
//! amplification, and acronym expansion.

use std::collections::BTreeSet;

use priorart_core::config::EnrichSettings;
use priorart_core::types::EnrichedQuery;
use tracing::debug;

use crate::vocab::{BoostTermSet, DomainConstraintTable, Vocabulary};

/// Linguistic stop-words and articles dropped from the token stream.
const STOPWORDS: &[&str] = &[
    "to", "a", "an", "the", "in", "on", "at", "by", "for", "of", "and", "or", "is", "are",
];

/// Punctuation trimmed from token edges before any table lookup.
const TOKEN_TRIM: &[char] = &['.', ',', ';', ':', '(', ')', '"', '\'', '?', '!'];

pub struct TermEnricher {
    vocab: Vocabulary,
    constraints: DomainConstraintTable,
    boosts: BoostTermSet,
    settings: EnrichSettings,
}

impl TermEnricher {
    pub fn new(
        vocab: Vocabulary,
        constraints: DomainConstraintTable,
        boosts: BoostTermSet,
        settings: EnrichSettings,
    ) -> Self {
        Self { vocab, constraints, boosts, settings }
    }

    /// Enrich phrase-substituted text into the final query.
    ///
    /// Every surviving token is kept verbatim; expansions and boost
    /// repetitions are appended after it. Unknown tokens pass through and
    /// contribute nothing beyond their literal text.
    pub fn enrich(&self, text: &str) -> EnrichedQuery {
        let mut stream: Vec<String> = Vec::new();
        let mut constraints: BTreeSet<String> = BTreeSet::new();

        for raw_token in text.split_whitespace() {
            let token = raw_token.trim_matches(TOKEN_TRIM);
            if token.is_empty() || STOPWORDS.contains(&token.to_lowercase().as_str()) {
                continue;
            }
            stream.push(token.to_string());

            let upper = token.to_uppercase();

            if let Some(terms) = self.constraints.presence_terms(&upper) {
                constraints.extend(terms.iter().cloned());
            }

            if self.boosts.contains(&upper) {
                self.push_repetitions(&mut stream, token);
            }

            if let Some(definition) = self.vocab.definition_text(&upper) {
                if definition.len() < self.settings.max_definition_len {
                    stream.push(format!("({definition})"));
                    for boost in self.boosts.found_in(&definition) {
                        self.push_repetitions(&mut stream, &boost.to_lowercase());
                    }
                } else {
                    debug!(token = %upper, len = definition.len(), "definition over length cap, skipping expansion");
                }
            }
        }

        EnrichedQuery { text: stream.join(" "), constraints }
    }

    fn push_repetitions(&self, stream: &mut Vec<String>, token: &str) {
        for _ in 0..self.settings.boost_repetitions {
            stream.push(token.to_string());
        }
    }
}
