//! Immutable vocabulary, domain-constraint, and boost-term tables.
//!
//! All three are built once at process start and shared read-only by the
//! pipeline. Missing or corrupt source files degrade to empty tables with a
//! warning; an empty table simply never matches.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use tracing::warn;

/// Uppercase short form → ordered list of long-form definitions.
///
/// Definitions from one source are appended in insertion order and never
/// silently dropped. A higher-priority override source replaces an entry
/// wholesale.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: HashMap<String, Vec<String>>,
}

impl Vocabulary {
    /// Merge a base and an override source. Override keys win per entry.
    pub fn merged(base: HashMap<String, String>, overrides: HashMap<String, String>) -> Self {
        let mut vocab = Self::default();
        for (key, raw) in base {
            vocab.add_entry(&key, &raw);
        }
        for (key, raw) in overrides {
            vocab.replace_entry(&key, &raw);
        }
        vocab
    }

    /// Load from optional JSON files mapping short form to a semicolon-joined
    /// definition string. Either path may be absent.
    pub fn from_files(base: Option<&Path>, overrides: Option<&Path>) -> Self {
        Self::merged(
            base.map(load_string_map).unwrap_or_default(),
            overrides.map(load_string_map).unwrap_or_default(),
        )
    }

    fn add_entry(&mut self, key: &str, raw: &str) {
        let defs = self.entries.entry(key.trim().to_uppercase()).or_default();
        for part in split_definitions(raw) {
            if !defs.contains(&part) {
                defs.push(part);
            }
        }
    }

    fn replace_entry(&mut self, key: &str, raw: &str) {
        self.entries.insert(key.trim().to_uppercase(), split_definitions(raw));
    }

    /// Exact-match lookup by uppercase short form.
    pub fn definitions(&self, upper_key: &str) -> Option<&[String]> {
        self.entries.get(upper_key).map(Vec::as_slice)
    }

    /// All definitions for a key joined with "; ", ready for display.
    pub fn definition_text(&self, upper_key: &str) -> Option<String> {
        self.definitions(upper_key).map(|defs| defs.join("; "))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Long-form phrase (lowercase) → short form, for phrase substitution.
    ///
    /// Includes every definition longer than one character that contains a
    /// space or hyphen, plus any vocabulary keys that are themselves
    /// multi-word or hyphenated.
    pub fn reverse_phrases(&self) -> HashMap<String, String> {
        let mut phrases = HashMap::new();
        for (short, defs) in &self.entries {
            if short.contains(' ') || short.contains('-') {
                phrases.insert(short.to_lowercase(), short.clone());
            }
            for def in defs {
                if def.len() > 1 && (def.contains(' ') || def.contains('-')) {
                    phrases.insert(def.to_lowercase(), short.clone());
                }
            }
        }
        phrases
    }
}

fn split_definitions(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_string_map(path: &Path) -> HashMap<String, String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "vocabulary file unreadable, using empty table");
                HashMap::new()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "vocabulary file missing, using empty table");
            HashMap::new()
        }
    }
}

/// Uppercase trigger term → set of lowercase presence terms.
///
/// A query token whose uppercase form matches a trigger forces returned
/// passages to contain at least one of the mapped presence terms. Presence
/// terms are registered as triggers for their own set too, so a literal
/// "device-to-device" in the query activates the sidelink constraint without
/// needing the umbrella term.
#[derive(Debug, Clone, Default)]
pub struct DomainConstraintTable {
    triggers: HashMap<String, BTreeSet<String>>,
}

impl DomainConstraintTable {
    pub fn new(raw: HashMap<String, BTreeSet<String>>) -> Self {
        let mut triggers: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (trigger, terms) in raw {
            let terms: BTreeSet<String> =
                terms.into_iter().map(|t| t.to_lowercase()).collect();
            for presence in &terms {
                triggers
                    .entry(presence.to_uppercase())
                    .or_default()
                    .extend(terms.iter().cloned());
            }
            triggers.entry(trigger.to_uppercase()).or_default().extend(terms);
        }
        Self { triggers }
    }

    /// The built-in sidelink domain table.
    pub fn builtin() -> Self {
        let mut raw = HashMap::new();
        raw.insert(
            "SIDELINK".to_string(),
            ["sidelink", "v2x", "pc5", "prose", "device-to-device", "d2d"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        );
        Self::new(raw)
    }

    /// Load from a JSON file mapping trigger to an array of presence terms.
    /// A missing file falls back to the built-in table.
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, BTreeSet<String>>>(&raw) {
                Ok(map) => Self::new(map),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "constraint table unreadable, using built-in");
                    Self::builtin()
                }
            },
            Err(_) => Self::builtin(),
        }
    }

    pub fn presence_terms(&self, upper_token: &str) -> Option<&BTreeSet<String>> {
        self.triggers.get(upper_token)
    }
}

/// Uppercase terms whose query occurrences are amplified for lexical scoring.
#[derive(Debug, Clone)]
pub struct BoostTermSet {
    terms: HashSet<String>,
}

impl BoostTermSet {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { terms: terms.into_iter().map(|t| t.as_ref().to_uppercase()).collect() }
    }

    pub fn builtin() -> Self {
        Self::new(["SIDELINK", "V2X", "PC5", "PROSE", "D2D"])
    }

    pub fn contains(&self, upper_token: &str) -> bool {
        self.terms.contains(upper_token)
    }

    /// Boost terms present (case-insensitive) inside a definition string, in
    /// deterministic order.
    pub fn found_in(&self, text: &str) -> Vec<&str> {
        let upper = text.to_uppercase();
        let mut found: Vec<&str> =
            self.terms.iter().filter(|t| upper.contains(t.as_str())).map(String::as_str).collect();
        found.sort_unstable();
        found
    }
}

impl Default for BoostTermSet {
    fn default() -> Self {
        Self::builtin()
    }
}
