//! Parsing and validation of the model's JSON answer protocol.
//!
//! The model is asked for a JSON array of sentence/citation objects, but
//! its output is untrusted text on a wire: it must be validated, never
//! assumed. Decoding has exactly three outcomes (answered, empty, or
//! fallback) and never fails past this boundary. There is deliberately no
//! partial recovery (no scraping sentences out of malformed output):
//! showing the raw text with a warning preserves transparency over
//! guessing.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::RetrievalResult;

/// One sentence of an answer with its supporting citation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnswerSentence {
    /// The sentence text.
    pub sentence: String,
    /// Formatted as `"<source_name>, page <page_number>"`.
    pub citation: String,
}

/// Outcome of decoding the model's raw output.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedAnswer {
    /// Strict decode succeeded with at least one sentence.
    Answered(Vec<AnswerSentence>),
    /// The literal empty array: the model judged the question unanswerable
    /// from the supplied context. Intentional, distinct from a parse
    /// failure.
    Empty,
    /// Decode failed; the raw output is preserved verbatim for display.
    Fallback {
        /// The model output exactly as received.
        raw: String,
    },
}

/// Result of cross-checking one citation against the retrieved chunk set.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CitationCheck {
    /// The citation string as emitted by the model.
    pub citation: String,
    /// Whether the citation names a (source, page) pair that was actually
    /// retrieved for this question.
    pub verified: bool,
}

fn citation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^.+, page \d+$").expect("citation pattern compiles"))
}

/// Decode raw model output into a [`ParsedAnswer`].
///
/// Strict decode: the output must be a JSON array of objects with exactly
/// the keys `sentence` and `citation` (both strings), and every citation
/// must match `"<text>, page <integer>"`. The citation is not required to
/// exist in the document; checking that is [`verify_citations`]' job.
/// Anything else (malformed JSON, a non-array top level, missing or extra
/// keys, a citation pattern violation) degrades to
/// [`ParsedAnswer::Fallback`] with the input preserved verbatim.
///
/// Never returns an error and performs no retries; retrying the model
/// call is the caller's policy decision.
pub fn parse(raw: &str) -> ParsedAnswer {
    let sentences: Vec<AnswerSentence> = match serde_json::from_str(raw) {
        Ok(sentences) => sentences,
        Err(_) => return ParsedAnswer::Fallback { raw: raw.to_string() },
    };

    if sentences.is_empty() {
        return ParsedAnswer::Empty;
    }
    if sentences.iter().any(|s| !citation_pattern().is_match(&s.citation)) {
        return ParsedAnswer::Fallback { raw: raw.to_string() };
    }

    ParsedAnswer::Answered(sentences)
}

/// Cross-check each citation against the retrieved chunk set.
///
/// The model is only trusted to choose among the supplied chunks; a
/// citation naming a (source, page) pair outside the retrieved set is
/// flagged as unverified rather than silently accepted.
pub fn verify_citations(
    sentences: &[AnswerSentence],
    sources: &[RetrievalResult],
) -> Vec<CitationCheck> {
    sentences
        .iter()
        .map(|s| CitationCheck {
            citation: s.citation.clone(),
            verified: sources
                .iter()
                .any(|r| s.citation == format!("{}, page {}", r.source_name, r.page_number)),
        })
        .collect()
}
