//! Query-time retrieval: embed the question, search the index, map ids
//! back to chunk text and metadata.

use std::sync::Arc;

use tracing::debug;

use crate::document::RetrievalResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::retry::{RetryPolicy, with_retry};

/// Finds the passages most relevant to a question.
///
/// A pure function of (question, index state): no caching, no cross-query
/// state. The wrapped index must be fully built before the first call.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    similarity_threshold: f64,
    retry: RetryPolicy,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
        similarity_threshold: f64,
        retry: RetryPolicy,
    ) -> Self {
        Self { embedder, index, top_k, similarity_threshold, retry }
    }

    /// Retrieve the configured `top_k` most relevant passages.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievalResult>> {
        self.retrieve_k(question, self.top_k).await
    }

    /// Retrieve with a caller-chosen `k`.
    ///
    /// A `k` larger than the index is clamped to the index size, not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexEmpty`] if nothing has been indexed, and
    /// propagates embedding failures after the retry budget is spent.
    pub async fn retrieve_k(&self, question: &str, k: usize) -> Result<Vec<RetrievalResult>> {
        if self.index.is_empty().await {
            return Err(RagError::IndexEmpty);
        }

        let query =
            with_retry(&self.retry, "question embedding", || self.embedder.embed(question)).await?;

        let hits = self.index.search(&query, k).await?;
        let mut results = Vec::with_capacity(hits.len());
        for (id, score) in hits {
            if score < self.similarity_threshold {
                continue;
            }
            let chunk = self.index.get(id).await?;
            results.push(RetrievalResult {
                text: chunk.text,
                source_name: chunk.source_name,
                page_number: chunk.page_number,
                score,
            });
        }

        debug!(result_count = results.len(), k, "retrieved passages");
        Ok(results)
    }
}
