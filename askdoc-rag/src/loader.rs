//! Document sources: loading files into page-structured [`Document`]s.
//!
//! PDF extraction itself is delegated to `pdf-extract` (enable the `pdf`
//! feature); this module only shapes its output into the page model.

use std::path::Path;

use tracing::info;

use crate::document::{Document, PageText};
use crate::error::{RagError, Result};

/// A source of documents, one per file path.
///
/// Loading happens once at startup; a load failure is fatal to the
/// session, so implementations report it rather than degrade.
pub trait DocumentSource: Send + Sync {
    /// Load a document from the given path.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Load`] on a missing, unreadable, or corrupt
    /// file.
    fn load(&self, path: &Path) -> Result<Document>;
}

/// Citation-facing name for a path: the file name when there is one.
fn source_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Loads a PDF with one [`PageText`] per physical page, 0-indexed.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfSource;

#[cfg(feature = "pdf")]
impl DocumentSource for PdfSource {
    fn load(&self, path: &Path) -> Result<Document> {
        let pages = pdf_extract::extract_text_by_pages(path).map_err(|e| RagError::Load {
            source_name: path.display().to_string(),
            message: format!("failed to extract PDF text: {e}"),
        })?;

        let source_name = source_name_for(path);
        info!(source = %source_name, page_count = pages.len(), "loaded PDF");

        Ok(Document {
            id: source_name.clone(),
            source_name,
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(page_number, raw_text)| PageText { page_number, raw_text })
                .collect(),
        })
    }
}

/// Loads a UTF-8 text file as a single-page document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSource;

impl DocumentSource for TextSource {
    fn load(&self, path: &Path) -> Result<Document> {
        let raw_text = std::fs::read_to_string(path).map_err(|e| RagError::Load {
            source_name: path.display().to_string(),
            message: format!("failed to read text file: {e}"),
        })?;

        let source_name = source_name_for(path);
        info!(source = %source_name, bytes = raw_text.len(), "loaded text file");

        Ok(Document {
            id: source_name.clone(),
            source_name,
            pages: vec![PageText { page_number: 0, raw_text }],
        })
    }
}
