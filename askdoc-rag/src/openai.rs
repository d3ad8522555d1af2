//! OpenAI backends for embeddings and chat completions.
//!
//! This module is only available when the `openai` feature is enabled.
//! Both clients call the HTTP API directly with `reqwest`; API keys are
//! passed in explicitly at construction, never read from the environment
//! inside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::model::LanguageModel;

/// The OpenAI embeddings API endpoint.
const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// The OpenAI chat completions API endpoint.
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// Whether a failed HTTP exchange is worth retrying.
///
/// Transport failures and throttling/server statuses are transient;
/// anything else (auth, bad request) will fail identically on retry.
fn retryable_status(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract the API's error message from a failure body, falling back to
/// the raw body.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ── Embeddings ─────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbeddingProvider {
    /// Create a new provider for the given model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the API key is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "OpenAI".into(),
                message: "API key must not be empty".into(),
                retryable: false,
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Override the expected output dimensions (model-dependent).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: "OpenAI".into(),
            message: "API returned empty response".into(),
            retryable: false,
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbeddingRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "embeddings request failed");
                RagError::Embedding {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                    retryable: true,
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "embeddings API error");
            return Err(RagError::Embedding {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {}", error_detail(&body)),
                retryable: retryable_status(status),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse embeddings response");
            RagError::Embedding {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
                retryable: false,
            }
        })?;

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Chat completions ───────────────────────────────────────────────

/// A [`LanguageModel`] backed by the OpenAI chat completions API.
///
/// Sends the assembled prompt as a single user message. Temperature comes
/// from the session configuration (0.0 keeps cited answers reproducible).
pub struct OpenAIChatModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenAIChatModel {
    /// Create a new chat client.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Model`] if the API key is empty.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Model {
                provider: "OpenAI".into(),
                message: "API key must not be empty".into(),
                retryable: false,
            });
        }

        Ok(Self { client: reqwest::Client::new(), api_key, model: model.into(), temperature })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "requesting completion");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "chat request failed");
                RagError::Model {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                    retryable: true,
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "chat API error");
            return Err(RagError::Model {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {}", error_detail(&body)),
                retryable: retryable_status(status),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse chat response");
            RagError::Model {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
                retryable: false,
            }
        })?;

        chat_response.choices.into_iter().next().map(|c| c.message.content).ok_or_else(|| {
            RagError::Model {
                provider: "OpenAI".into(),
                message: "API returned no choices".into(),
                retryable: false,
            }
        })
    }

    fn name(&self) -> &str {
        &self.model
    }
}
