//! Dense similarity scoring.

use priorart_core::error::{Error, Result};

/// An immutable matrix of L2-normalized passage embeddings.
///
/// Stored as a flat row-major buffer; every row has the corpus-wide
/// dimensionality. Vectors with zero norm are kept as-is (their norm is
/// treated as 1), which makes their similarity to any query exactly 0 instead
/// of a division fault.
pub struct SemanticIndex {
    dim: usize,
    rows: usize,
    data: Vec<f32>,
}

impl SemanticIndex {
    /// Build from per-passage embeddings. Every vector must already have
    /// length `dim`; the corpus loader rejects mismatches before this point,
    /// so a mismatch here is a programming error reported as such.
    pub fn build(embeddings: &[Vec<f32>], dim: usize) -> Result<Self> {
        let mut data = Vec::with_capacity(embeddings.len() * dim);
        for vector in embeddings {
            if vector.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, got: vector.len() });
            }
            data.extend(normalized(vector));
        }
        Ok(Self { dim, rows: embeddings.len(), data })
    }

    /// An index with no rows, used when a corpus degrades to lexical-only.
    pub fn empty(dim: usize) -> Self {
        Self { dim, rows: 0, data: Vec::new() }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Cosine similarity of the query against every passage, clipped to
    /// [0, 1]. Negative cosine is treated as zero relevance.
    pub fn scores(&self, query: &[f32]) -> Result<Vec<f32>> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: query.len() });
        }
        let q = normalized(query);
        let scores = self
            .data
            .chunks_exact(self.dim.max(1))
            .map(|row| row.iter().zip(&q).map(|(a, b)| a * b).sum::<f32>().clamp(0.0, 1.0))
            .collect();
        Ok(scores)
    }
}

fn normalized(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter().map(|x| x / norm).collect()
    } else {
        vector.to_vec()
    }
}
