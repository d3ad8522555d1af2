//! Vector index trait: storage plus top-k similarity search.

use async_trait::async_trait;

use crate::document::{Chunk, ChunkId, EmbeddedChunk};
use crate::error::Result;

/// A store of embedded chunks supporting top-k similarity queries.
///
/// The index is built once at startup and read-only afterward; there are
/// no updates, deletes, or re-embeddings. Because the built index is
/// immutable, it can be shared freely across concurrent readers.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert an embedded chunk and return its assigned id.
    ///
    /// Ids are assigned append-only and remain stable for the session.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`](crate::error::RagError::Index) if the
    /// vector's dimension differs from previously inserted vectors.
    async fn insert(&self, chunk: EmbeddedChunk) -> Result<ChunkId>;

    /// Return up to `k` stored ids ordered by descending similarity to
    /// `query`; equal scores are ordered by ascending insertion id.
    ///
    /// `k == 0` and an empty index both yield an empty result, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`](crate::error::RagError::Index) if the
    /// query dimension does not match the stored vectors.
    async fn search(&self, query: &[f64], k: usize) -> Result<Vec<(ChunkId, f64)>>;

    /// Look up the chunk stored under `id`.
    async fn get(&self, id: ChunkId) -> Result<Chunk>;

    /// Number of stored chunks.
    async fn len(&self) -> usize;

    /// Whether the index holds no chunks.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
