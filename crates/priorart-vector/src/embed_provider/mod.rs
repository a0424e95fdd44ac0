//! Query-embedding providers.
//!
//! The engine talks to [`QueryEmbedder`] only. Two implementations live here:
//! a deterministic stub for tests and offline development, and a timeout
//! wrapper that bounds a live provider's wall-clock latency. Which provider a
//! process uses is a configuration decision, not exception-driven fallback
//! inside the engine.

use priorart_core::config::EmbeddingSettings;
use priorart_core::traits::QueryEmbedder;

pub mod stub;
pub mod timeout;

pub use stub::StubEmbedder;
pub use timeout::TimeboxedEmbedder;

/// Select a provider from configuration.
///
/// Returns the stub when `use_stub` is set (the default) or when no live
/// provider has been supplied; otherwise wraps the live provider in the
/// configured timeout.
pub fn embedder_from_settings(
    settings: &EmbeddingSettings,
    live: Option<Box<dyn QueryEmbedder>>,
) -> Box<dyn QueryEmbedder> {
    match live {
        Some(provider) if !settings.use_stub => {
            Box::new(TimeboxedEmbedder::new(provider, settings.timeout_ms))
        }
        _ => Box::new(StubEmbedder::new(settings.dim.max(1))),
    }
}
