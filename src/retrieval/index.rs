//! In-memory vector index owned by a single session
//!
//! The index is rebuilt wholesale on every upload batch and holds at most a
//! few thousand chunks, so exact brute-force cosine search is used instead
//! of an approximate structure.

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Search result from the index
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched chunk
    pub chunk: Chunk,
    /// Cosine similarity (-1.0 to 1.0, higher is more similar)
    pub similarity: f32,
}

/// Immutable vector index over one upload batch
#[derive(Debug)]
pub struct SessionIndex {
    chunks: Vec<Chunk>,
    dimensions: usize,
}

impl SessionIndex {
    /// Build an index from embedded chunks
    ///
    /// Every chunk must carry an embedding of the same dimension; the index
    /// is only constructed once the whole batch embedded successfully, so a
    /// missing vector is a logic error upstream.
    pub fn build(chunks: Vec<Chunk>) -> Result<Self> {
        let dimensions = chunks
            .first()
            .map(|c| c.embedding.len())
            .ok_or_else(|| Error::Internal("Cannot build an index from zero chunks".to_string()))?;

        if dimensions == 0 {
            return Err(Error::Internal(
                "Chunk embeddings are empty; index build aborted".to_string(),
            ));
        }

        for chunk in &chunks {
            if chunk.embedding.len() != dimensions {
                return Err(Error::Internal(format!(
                    "Embedding dimension mismatch: expected {}, chunk {} has {}",
                    dimensions,
                    chunk.id,
                    chunk.embedding.len()
                )));
            }
        }

        Ok(Self { chunks, dimensions })
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding dimensionality
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Retrieve the top-k most similar chunks for a query embedding
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
        if query_embedding.len() != self.dimensions {
            return Err(Error::Internal(format!(
                "Query embedding dimension mismatch: expected {}, got {}",
                self.dimensions,
                query_embedding.len()
            )));
        }

        let mut results: Vec<VectorSearchResult> = self
            .chunks
            .iter()
            .map(|chunk| VectorSearchResult {
                chunk: chunk.clone(),
                similarity: cosine_similarity(query_embedding, &chunk.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);

        Ok(results)
    }
}

/// Cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
