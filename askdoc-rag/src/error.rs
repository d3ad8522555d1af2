//! Error types for the `askdoc-rag` crate.

use thiserror::Error;

/// Errors that can occur while building or querying the pipeline.
///
/// Malformed model output is deliberately *not* represented here: the
/// answer parser never fails and reports its outcome through
/// [`ParsedAnswer`](crate::answer::ParsedAnswer) instead.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document could not be loaded. Fatal at startup.
    #[error("Load error ({source_name}): {message}")]
    Load {
        /// Path or name of the document that failed to load.
        source_name: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// Whether retrying the call may succeed.
        retryable: bool,
    },

    /// An error occurred in the language-model backend.
    #[error("Model error ({provider}): {message}")]
    Model {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// Whether retrying the call may succeed.
        retryable: bool,
    },

    /// An invariant violation in the vector index (dimension mismatch,
    /// unknown id).
    #[error("Index error: {0}")]
    Index(String),

    /// A query was issued before any chunks were indexed. Defensive;
    /// unreachable given the startup ordering of build-then-serve.
    #[error("index is empty; ingest a document before querying")]
    IndexEmpty,

    /// A configuration validation error. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in the pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl RagError {
    /// Whether the failed call crossed a network boundary and may succeed
    /// on retry (transient provider or transport failures).
    pub fn is_retryable(&self) -> bool {
        match self {
            RagError::Embedding { retryable, .. } | RagError::Model { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
