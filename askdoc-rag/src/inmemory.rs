//! In-memory vector index using brute-force cosine similarity.
//!
//! [`InMemoryIndex`] scores every stored vector against the query and
//! sorts to extract the top k. At the corpus sizes produced by a single
//! ingested document this is the right trade: approximate-nearest-neighbor
//! structures are out of scope for a small, static workload.

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, ChunkId, EmbeddedChunk};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// An in-memory [`VectorIndex`] backed by an append-only `Vec`.
///
/// The insertion position doubles as the chunk id, which makes ids dense,
/// stable, and free. Interior access goes through `tokio::sync::RwLock`:
/// the build phase takes write locks, queries take read locks.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: RwLock<Vec<EmbeddedChunk>>,
}

impl InMemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 if either vector has zero magnitude. Embedding vectors from
/// typical providers are magnitude-inconsistent, so the normalized measure
/// is more stable than raw Euclidean distance for semantic matching.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn insert(&self, chunk: EmbeddedChunk) -> Result<ChunkId> {
        let mut entries = self.entries.write().await;
        if let Some(first) = entries.first() {
            if first.vector.len() != chunk.vector.len() {
                return Err(RagError::Index(format!(
                    "dimension mismatch: index holds {}-dimensional vectors, got {}",
                    first.vector.len(),
                    chunk.vector.len()
                )));
            }
        }
        entries.push(chunk);
        Ok(entries.len() - 1)
    }

    async fn search(&self, query: &[f64], k: usize) -> Result<Vec<(ChunkId, f64)>> {
        let entries = self.entries.read().await;
        if k == 0 || entries.is_empty() {
            return Ok(Vec::new());
        }
        if entries[0].vector.len() != query.len() {
            return Err(RagError::Index(format!(
                "dimension mismatch: index holds {}-dimensional vectors, query has {}",
                entries[0].vector.len(),
                query.len()
            )));
        }

        let mut scored: Vec<(ChunkId, f64)> = entries
            .iter()
            .enumerate()
            .map(|(id, entry)| (id, cosine_similarity(&entry.vector, query)))
            .collect();

        // Descending score; equal scores fall back to ascending insertion
        // id so results are reproducible for a fixed corpus.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn get(&self, id: ChunkId) -> Result<Chunk> {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .map(|entry| entry.chunk.clone())
            .ok_or_else(|| RagError::Index(format!("unknown chunk id {id}")))
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
