//! Question-answering pipeline orchestrator.
//!
//! [`QaPipeline`] coordinates the whole flow by composing a [`Chunker`],
//! an [`EmbeddingProvider`], a [`VectorIndex`], and a [`LanguageModel`].
//! Build time: chunk → embed → insert, once, before the first question.
//! Per question: retrieve → assemble prompt → complete → parse →
//! cross-check citations, strictly in sequence.

use std::sync::Arc;

use tracing::{error, info};

use crate::answer::{self, CitationCheck, ParsedAnswer};
use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Document, EmbeddedChunk, RetrievalResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::model::LanguageModel;
use crate::prompt::PromptAssembler;
use crate::retriever::Retriever;
use crate::retry::{RetryPolicy, with_retry};

/// The full result of asking one question.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Decoded model output (answered, empty, or fallback).
    pub parsed: ParsedAnswer,
    /// The passages the answer was grounded on, most relevant first.
    pub sources: Vec<RetrievalResult>,
    /// Per-sentence citation audit; empty unless the answer decoded.
    pub checks: Vec<CitationCheck>,
}

/// The question-answering pipeline.
///
/// Construct one via [`QaPipeline::builder()`], index a document with
/// [`index_document`](QaPipeline::index_document), then serve questions
/// with [`ask`](QaPipeline::ask). The index is read-only once built.
pub struct QaPipeline {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn LanguageModel>,
    assembler: PromptAssembler,
    retriever: Retriever,
    retry: RetryPolicy,
}

impl QaPipeline {
    /// Create a new [`QaPipelineBuilder`].
    pub fn builder() -> QaPipelineBuilder {
        QaPipelineBuilder::default()
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Chunk, embed, and index a document. Returns the chunk count.
    ///
    /// This is the build phase: call it once per session, before the
    /// first question.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Pipeline`] if embedding or insertion fails,
    /// with the document id in the message.
    pub async fn index_document(&self, document: &Document) -> Result<usize> {
        let chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "indexed document (empty)");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors =
            with_retry(&self.retry, "chunk embedding", || self.embedder.embed_batch(&texts))
                .await
                .map_err(|e| {
                    error!(document.id = %document.id, error = %e, "embedding failed during indexing");
                    RagError::Pipeline(format!(
                        "embedding failed for document '{}': {e}",
                        document.id
                    ))
                })?;

        let chunk_count = chunks.len();
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            self.index.insert(EmbeddedChunk { chunk, vector }).await.map_err(|e| {
                error!(document.id = %document.id, error = %e, "insert failed during indexing");
                RagError::Pipeline(format!("insert failed for document '{}': {e}", document.id))
            })?;
        }

        info!(document.id = %document.id, chunk_count, "indexed document");
        Ok(chunk_count)
    }

    /// Answer one question: retrieve → prompt → complete → parse →
    /// cross-check.
    ///
    /// Malformed model output is not an error: it comes back as
    /// [`ParsedAnswer::Fallback`] with the raw text preserved. Errors here
    /// are per-query (embedding, model, index) and leave the pipeline
    /// fully usable for the next question.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let sources = self.retriever.retrieve(question).await?;

        let prompt = self.assembler.assemble(question, &sources);
        let raw = with_retry(&self.retry, "model completion", || self.model.complete(&prompt))
            .await
            .map_err(|e| {
                error!(model = %self.model.name(), error = %e, "completion failed");
                e
            })?;

        let parsed = answer::parse(&raw);
        let checks = match &parsed {
            ParsedAnswer::Answered(sentences) => answer::verify_citations(sentences, &sources),
            _ => Vec::new(),
        };

        let outcome = match &parsed {
            ParsedAnswer::Answered(_) => "answered",
            ParsedAnswer::Empty => "empty",
            ParsedAnswer::Fallback { .. } => "fallback",
        };
        info!(source_count = sources.len(), outcome, "question answered");

        Ok(Answer { parsed, sources, checks })
    }
}

/// Builder for constructing a [`QaPipeline`].
///
/// Config, chunker, embedding provider, index, and model are required;
/// the retry policy defaults to three attempts with 200ms base backoff.
#[derive(Default)]
pub struct QaPipelineBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
    model: Option<Arc<dyn LanguageModel>>,
    retry: Option<RetryPolicy>,
}

impl QaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the language model.
    pub fn model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the retry policy for the two network-crossing calls.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the [`QaPipeline`], validating that all required components
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required component is missing.
    pub fn build(self) -> Result<QaPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let index = self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;
        let model = self.model.ok_or_else(|| RagError::Config("model is required".to_string()))?;
        let retry = self.retry.unwrap_or_default();

        let retriever = Retriever::new(
            Arc::clone(&embedder),
            Arc::clone(&index),
            config.top_k,
            config.similarity_threshold,
            retry.clone(),
        );

        Ok(QaPipeline {
            config,
            chunker,
            embedder,
            index,
            model,
            assembler: PromptAssembler,
            retriever,
            retry,
        })
    }
}
