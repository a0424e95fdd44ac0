//! Configuration loader and typed engine settings.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars. Provides helpers to expand `~` and `${VAR}` and to resolve relative
//! paths against a known base directory, plus the typed settings blocks used
//! by the enrichment pipeline and the retrieval engine.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract a settings block, falling back to defaults when the key is
    /// absent from every merged source.
    pub fn section<T>(&self, key: &str) -> T
    where
        T: serde::de::DeserializeOwned + Default,
    {
        self.figment.extract_inner(key).unwrap_or_default()
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            search: self.section("search"),
            bm25: self.section("bm25"),
            enrich: self.section("enrich"),
            embedding: self.section("embedding"),
        }
    }
}

/// All tunables consumed by the retrieval stack, grouped the way they appear
/// in `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub bm25: Bm25Settings,
    #[serde(default)]
    pub enrich: EnrichSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Blend weight between lexical (0.0) and semantic (1.0) scores.
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bm25Settings {
    #[serde(default = "default_k1")]
    pub k1: f32,
    #[serde(default = "default_b")]
    pub b: f32,
    /// Floor factor for negative IDF values (Okapi convention).
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichSettings {
    /// Extra repetitions appended for each boost-term occurrence.
    #[serde(default = "default_boost_repetitions")]
    pub boost_repetitions: usize,
    /// Definitions longer than this are not injected into the query.
    #[serde(default = "default_max_definition_len")]
    pub max_definition_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    /// Corpus-wide embedding dimensionality. 0 means infer from the corpus.
    #[serde(default)]
    pub dim: usize,
    /// Select the deterministic stub provider instead of a live one.
    #[serde(default = "default_use_stub")]
    pub use_stub: bool,
    /// Wall-clock bound for a query embedding call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_alpha() -> f32 {
    0.5
}
fn default_top_k() -> usize {
    10
}
fn default_k1() -> f32 {
    1.5
}
fn default_b() -> f32 {
    0.75
}
fn default_epsilon() -> f32 {
    0.25
}
fn default_boost_repetitions() -> usize {
    5
}
fn default_max_definition_len() -> usize {
    120
}
fn default_use_stub() -> bool {
    true
}
fn default_timeout_ms() -> u64 {
    2_000
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { alpha: default_alpha(), top_k: default_top_k() }
    }
}

impl Default for Bm25Settings {
    fn default() -> Self {
        Self { k1: default_k1(), b: default_b(), epsilon: default_epsilon() }
    }
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            boost_repetitions: default_boost_repetitions(),
            max_definition_len: default_max_definition_len(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { dim: 0, use_stub: default_use_stub(), timeout_ms: default_timeout_ms() }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
