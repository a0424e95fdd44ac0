//! Deterministic stub embedder.
//!
//! Hashes each whitespace token into one position of the output vector, so
//! identical texts always embed identically and token overlap produces
//! nonzero cosine similarity. Useful for tests and offline development; not a
//! semantic model.

use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use priorart_core::traits::QueryEmbedder;

pub struct StubEmbedder {
    dim: usize,
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Embed arbitrary text; exposed so corpus fixtures can be built with the
    /// same recipe the query side uses.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl QueryEmbedder for StubEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }
}
