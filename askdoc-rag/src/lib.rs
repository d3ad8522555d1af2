//! Cited question answering over a fixed document corpus.
//!
//! `askdoc-rag` implements a retrieval-augmented generation pipeline for a
//! single ingested document: page-aware chunking, embedding, in-memory
//! vector search, grounded prompt assembly, and strict parsing of the
//! model's cited JSON answers.
//!
//! The external collaborators (document loading, the embedding provider,
//! and the language model) sit behind traits ([`DocumentSource`],
//! [`EmbeddingProvider`], [`LanguageModel`]) with one concrete
//! implementation each; swapping providers means implementing the trait,
//! nothing else. The index is built once at startup and read-only for the
//! rest of the session.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use askdoc_rag::{FixedSizeChunker, InMemoryIndex, QaPipeline, RagConfig};
//!
//! let config = RagConfig::default();
//! let pipeline = QaPipeline::builder()
//!     .config(config.clone())
//!     .chunker(Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .embedding_provider(Arc::new(my_embedder))
//!     .index(Arc::new(InMemoryIndex::new()))
//!     .model(Arc::new(my_model))
//!     .build()?;
//!
//! pipeline.index_document(&document).await?;
//! let answer = pipeline.ask("What color is the sky?").await?;
//! ```

pub mod answer;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inmemory;
pub mod loader;
pub mod model;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod retry;

pub use answer::{AnswerSentence, CitationCheck, ParsedAnswer, parse, verify_citations};
pub use chunking::{Chunker, FixedSizeChunker, SentenceChunker};
pub use config::RagConfig;
pub use document::{Chunk, ChunkId, Document, EmbeddedChunk, PageText, RetrievalResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::VectorIndex;
pub use inmemory::InMemoryIndex;
#[cfg(feature = "pdf")]
pub use loader::PdfSource;
pub use loader::{DocumentSource, TextSource};
pub use model::LanguageModel;
#[cfg(feature = "openai")]
pub use openai::{OpenAIChatModel, OpenAIEmbeddingProvider};
pub use pipeline::{Answer, QaPipeline, QaPipelineBuilder};
pub use prompt::PromptAssembler;
pub use retriever::Retriever;
pub use retry::RetryPolicy;
