//! Prompt assembly under the context-grounding contract.

use crate::document::RetrievalResult;

/// Renders the fixed question-answering prompt.
///
/// The rendered prompt always carries three instructions the rest of the
/// pipeline depends on: answer from the supplied context ONLY, decompose
/// into short sentences, and emit a JSON array of sentence/citation
/// objects, or the literal `[]` when the context does not support an
/// answer. There is no branching; omitting the format instruction would
/// break the downstream parser's contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    /// Render the prompt for one question over the retrieved passages.
    ///
    /// Each passage is prefixed with a `[<source>, page <n>]` citation
    /// hint, so the model only has to choose among supplied citations,
    /// never derive page numbers from raw text.
    pub fn assemble(&self, question: &str, results: &[RetrievalResult]) -> String {
        let context = results
            .iter()
            .map(|r| format!("[{}, page {}]\n{}", r.source_name, r.page_number, r.text))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "You are a helpful assistant. Use ONLY the context below to answer the question.\n\
             \n\
             Break the answer into multiple short sentences.\n\
             For each sentence, return a JSON object with two keys:\n\
             - \"sentence\": the sentence text\n\
             - \"citation\": the source in the format \"<source_name>, page <n>\"\n\
             \n\
             The final output MUST be a valid JSON array.\n\
             If the answer is not in the context, return: []\n\
             \n\
             Question: {question}\n\
             \n\
             Context:\n\
             {context}\n\
             \n\
             Answer as JSON:\n"
        )
    }
}
