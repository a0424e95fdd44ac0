//! Wall-clock bound for live embedding providers.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::warn;

use priorart_core::traits::QueryEmbedder;

/// Wraps a provider so a slow or hung external call cannot stall a search.
///
/// The inner call runs on a detached worker thread; if no result arrives
/// within the deadline an error is returned and the engine falls back to
/// lexical-only scoring. The worker finishes (or errors) in the background
/// and its late result is dropped.
pub struct TimeboxedEmbedder {
    inner: Arc<Box<dyn QueryEmbedder>>,
    deadline: Duration,
}

impl TimeboxedEmbedder {
    pub fn new(inner: Box<dyn QueryEmbedder>, timeout_ms: u64) -> Self {
        Self { inner: Arc::new(inner), deadline: Duration::from_millis(timeout_ms) }
    }
}

impl QueryEmbedder for TimeboxedEmbedder {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        std::thread::spawn(move || {
            // The receiver may be gone after a timeout; that is fine.
            let _ = tx.send(inner.embed_query(&text));
        });

        match rx.recv_timeout(self.deadline) {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.deadline.as_millis() as u64, "query embedding timed out");
                Err(anyhow!("query embedding timed out after {:?}", self.deadline))
            }
        }
    }
}
