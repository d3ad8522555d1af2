//! Data types for documents, pages, chunks, and retrieval results.

use serde::{Deserialize, Serialize};

/// A source document as an ordered sequence of extracted pages.
///
/// Immutable once loaded; the whole corpus for a session is a single
/// `Document`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// Display name used in citations (typically the file name).
    pub source_name: String,
    /// Page texts in source order.
    pub pages: Vec<PageText>,
}

/// The extracted text of a single page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageText {
    /// 0-indexed page number, matching the source numbering.
    pub page_number: usize,
    /// Raw extracted text for this page.
    pub raw_text: String,
}

/// A bounded slice of one page's text, the unit of retrieval.
///
/// A chunk never spans a page boundary, so its citation metadata stays
/// unambiguous. Consecutive chunks from the same page may overlap by a
/// configured number of characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The chunk text, at most `chunk_size` characters.
    pub text: String,
    /// Name of the originating document.
    pub source_name: String,
    /// 0-indexed page the text was cut from.
    pub page_number: usize,
    /// Position of this chunk within its page, strictly increasing.
    pub chunk_index: usize,
}

/// A [`Chunk`] paired with its embedding vector.
///
/// Owned by the index after insertion and never mutated. All vectors in
/// one index share a single dimension, fixed by the embedder instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f64>,
}

/// Identifier assigned by a vector index on insertion.
///
/// Assignment is append-only and stable for the session.
pub type ChunkId = usize;

/// A retrieved chunk with its similarity score.
///
/// Produced fresh per query; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// The retrieved chunk text.
    pub text: String,
    /// Name of the originating document.
    pub source_name: String,
    /// 0-indexed page the chunk was cut from.
    pub page_number: usize,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f64,
}
