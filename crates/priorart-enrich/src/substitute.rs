//! Multi-word phrase collapsing.

use crate::vocab::Vocabulary;

/// Rewrites multi-word or hyphenated vocabulary phrases into their canonical
/// short forms so that later tokenization sees a single enrichable token.
///
/// Phrases are matched longest-first to keep a long phrase from being
/// partially consumed by a shorter one. Matching is a case-insensitive
/// substring match on the already-lowercased input; it is deliberately not
/// word-boundary anchored.
pub struct PhraseSubstitutor {
    /// (lowercase phrase, short form), sorted by phrase length descending.
    phrases: Vec<(String, String)>,
}

impl PhraseSubstitutor {
    pub fn new(vocab: &Vocabulary) -> Self {
        let mut phrases: Vec<(String, String)> = vocab.reverse_phrases().into_iter().collect();
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { phrases }
    }

    /// Replace every phrase occurrence with its short form. Input is expected
    /// to be lowercase (the normalizer runs first).
    pub fn substitute(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (phrase, short) in &self.phrases {
            if out.contains(phrase.as_str()) {
                out = out.replace(phrase.as_str(), short);
            }
        }
        out
    }
}
