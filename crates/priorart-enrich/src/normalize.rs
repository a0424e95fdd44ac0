//! Legalese stripping for raw claim text.

use regex::Regex;

/// Ordered removal rules. Claim references must precede the bare generic
/// nouns so "the method of claim 1" is consumed in one piece.
const LEGALESE_RULES: &[&str] = &[
    r"\bcomprising\b",
    r"\bconsisting of\b",
    r"\bwherein\b",
    r"\bcharacterized in that\b",
    r"\bsaid\b",
    r"\bthe method of claim \d+\b",
    r"\baccording to claim \d+\b",
    r"\ba plurality of\b",
    r"\bconfigured to\b",
    r"\badapted to\b",
    r"\bmethod for\b",
    r"\bmethod\b",
    r"\bsystem\b",
    r"\bapparatus\b",
];

/// Strips boilerplate patent phrasing from raw query text.
///
/// Lower-cases the input, applies the fixed rule list in order (each match is
/// deleted), then collapses whitespace runs and trims. Total over any input;
/// running it on its own output is a no-op.
pub struct LegaleseNormalizer {
    rules: Vec<Regex>,
}

impl LegaleseNormalizer {
    pub fn new() -> Self {
        let rules = LEGALESE_RULES
            .iter()
            .map(|pattern| Regex::new(pattern).expect("legalese rule must compile"))
            .collect();
        Self { rules }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut text = raw.to_lowercase();
        for rule in &self.rules {
            text = rule.replace_all(&text, "").into_owned();
        }
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for LegaleseNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
