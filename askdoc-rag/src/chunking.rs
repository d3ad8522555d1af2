//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — cuts fixed-width character windows with overlap
//! - [`SentenceChunker`] — prefers paragraph and sentence boundaries
//!
//! Chunks never span a page boundary: each page is split independently, so
//! every chunk carries an unambiguous page number for citations.

use crate::document::{Chunk, Document, PageText};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and page metadata but no
/// embeddings; embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Pages with empty text yield no chunks. Output is ordered by page,
    /// then by `chunk_index` within the page.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

fn validate_window(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
    }
    if chunk_overlap >= chunk_size {
        // The window would never advance.
        return Err(RagError::Config(format!(
            "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

/// Byte offsets of the char boundaries of `text`, including `text.len()`.
///
/// Window arithmetic runs over char positions; slicing through this table
/// can never split a multi-byte code point.
fn char_boundaries(text: &str) -> Vec<usize> {
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    bounds
}

/// Cut fixed-width character windows with overlap.
///
/// The final partial window is emitted even when shorter than
/// `chunk_size`. Requires `chunk_overlap < chunk_size`.
fn windows(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let bounds = char_boundaries(text);
    let char_count = bounds.len() - 1;
    if char_count == 0 {
        return Vec::new();
    }

    let step = chunk_size - chunk_overlap;
    let mut out = Vec::new();
    let mut start = 0;
    while start < char_count {
        let end = (start + chunk_size).min(char_count);
        out.push(text[bounds[start]..bounds[end]].to_string());
        if end == char_count {
            break;
        }
        start += step;
    }
    out
}

/// Splits each page into fixed-size character windows with configurable
/// overlap.
///
/// This is the naive splitter: it cuts mid-sentence wherever the window
/// lands. Each window starts `chunk_size - chunk_overlap` characters after
/// the previous one, so consecutive chunks share `chunk_overlap` characters
/// of context.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_window(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for page in &document.pages {
            push_page_chunks(
                &mut chunks,
                windows(&page.raw_text, self.chunk_size, self.chunk_overlap),
                page,
                &document.source_name,
            );
        }
        chunks
    }
}

/// Splits each page hierarchically: paragraphs, then sentences, then words.
///
/// Segments are merged up to `chunk_size`; a single segment that still
/// exceeds the limit after the last separator level falls back to
/// fixed-size windows. Separators stay attached to the preceding segment,
/// so every chunk is a contiguous slice of its page.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceChunker {
    /// Create a new `SentenceChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        validate_window(chunk_size, chunk_overlap)?;
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let separators = ["\n\n", ". ", "! ", "? ", " "];
        let mut chunks = Vec::new();
        for page in &document.pages {
            push_page_chunks(
                &mut chunks,
                split_and_merge(&page.raw_text, self.chunk_size, self.chunk_overlap, &separators),
                page,
                &document.source_name,
            );
        }
        chunks
    }
}

fn push_page_chunks(out: &mut Vec<Chunk>, texts: Vec<String>, page: &PageText, source_name: &str) {
    for (chunk_index, text) in texts.into_iter().enumerate() {
        out.push(Chunk {
            text,
            source_name: source_name.to_string(),
            page_number: page.page_number,
            chunk_index,
        });
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Split by the first separator, merge segments up to `chunk_size` bytes,
/// and recurse into the next separator level for oversized segments.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if text.len() <= chunk_size || separators.is_empty() {
        return windows(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];

    let mut chunks = Vec::new();
    let mut current = String::new();

    for segment in split_keeping_separator(text, separator) {
        if !current.is_empty() && current.len() + segment.len() > chunk_size {
            flush_segment(&mut chunks, current, chunk_size, chunk_overlap, remaining_separators);
            current = String::new();
        }
        current.push_str(segment);
    }
    flush_segment(&mut chunks, current, chunk_size, chunk_overlap, remaining_separators);

    chunks
}

fn flush_segment(
    chunks: &mut Vec<String>,
    current: String,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) {
    if current.len() > chunk_size {
        chunks.extend(split_and_merge(&current, chunk_size, chunk_overlap, separators));
    } else if !current.is_empty() {
        chunks.push(current);
    }
}
