//! Language-model trait for generating answers from assembled prompts.

use async_trait::async_trait;

use crate::error::Result;

/// A text-completion backend.
///
/// The returned text carries no schema guarantee whatsoever; models
/// ignore format instructions often enough that validating the output is
/// the answer parser's whole job (see [`crate::answer`]).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for a single prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier used in logs and error messages.
    fn name(&self) -> &str;
}
