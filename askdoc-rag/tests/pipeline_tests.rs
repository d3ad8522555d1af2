//! End-to-end pipeline behavior with deterministic stand-ins for the two
//! network collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use askdoc_rag::{
    AnswerSentence, Document, EmbeddingProvider, FixedSizeChunker, InMemoryIndex, LanguageModel,
    PageText, ParsedAnswer, QaPipeline, RagConfig, RagError, RetryPolicy,
};

// ---------------------------------------------------------------------------
// Deterministic collaborators
// ---------------------------------------------------------------------------

const KEYWORDS: [&str; 3] = ["sky", "grass", "ocean"];

/// Embeds text as keyword-presence dimensions plus one shared component,
/// so texts about the same keyword land close together and everything
/// else stays weakly similar. Deterministic and verifiable by hand.
struct KeywordEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> askdoc_rag::Result<Vec<f64>> {
        let lower = text.to_lowercase();
        let mut vector: Vec<f64> =
            KEYWORDS.iter().map(|k| if lower.contains(k) { 1.0 } else { 0.0 }).collect();
        vector.push(1.0);
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        KEYWORDS.len() + 1
    }
}

/// Fails the first `failures` embed calls with a retryable error, then
/// delegates to [`KeywordEmbedder`].
struct FlakyEmbedder {
    failures: AtomicU32,
}

impl FlakyEmbedder {
    fn failing(failures: u32) -> Self {
        Self { failures: AtomicU32::new(failures) }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    async fn embed(&self, text: &str) -> askdoc_rag::Result<Vec<f64>> {
        if self.failures.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok()
        {
            return Err(RagError::Embedding {
                provider: "flaky".to_string(),
                message: "transient outage".to_string(),
                retryable: true,
            });
        }
        KeywordEmbedder.embed(text).await
    }

    fn dimensions(&self) -> usize {
        KeywordEmbedder.dimensions()
    }
}

/// Always fails, never retryably.
struct BrokenEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for BrokenEmbedder {
    async fn embed(&self, _text: &str) -> askdoc_rag::Result<Vec<f64>> {
        Err(RagError::Embedding {
            provider: "broken".to_string(),
            message: "invalid API key".to_string(),
            retryable: false,
        })
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Returns a canned completion regardless of the prompt.
struct StubModel {
    reply: String,
}

impl StubModel {
    fn replying(reply: &str) -> Self {
        Self { reply: reply.to_string() }
    }
}

#[async_trait::async_trait]
impl LanguageModel for StubModel {
    async fn complete(&self, _prompt: &str) -> askdoc_rag::Result<String> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn sky_document() -> Document {
    Document {
        id: "doc.pdf".to_string(),
        source_name: "doc.pdf".to_string(),
        pages: vec![
            PageText { page_number: 0, raw_text: "The sky is blue.".to_string() },
            PageText { page_number: 1, raw_text: "Grass is green.".to_string() },
        ],
    }
}

fn pipeline_with(
    embedder: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn LanguageModel>,
) -> QaPipeline {
    let config = RagConfig::default();
    QaPipeline::builder()
        .config(config.clone())
        .chunker(Arc::new(
            FixedSizeChunker::new(config.chunk_size, config.chunk_overlap).unwrap(),
        ))
        .embedding_provider(embedder)
        .index(Arc::new(InMemoryIndex::new()))
        .model(model)
        .retry(RetryPolicy { max_attempts: 3, base_delay: Duration::from_millis(1) })
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn answers_with_exact_cited_output() {
    let canned = r#"[{"sentence":"The sky is blue.","citation":"doc.pdf, page 0"}]"#;
    let pipeline =
        pipeline_with(Arc::new(KeywordEmbedder), Arc::new(StubModel::replying(canned)));

    let indexed = pipeline.index_document(&sky_document()).await.unwrap();
    assert_eq!(indexed, 2);

    let answer = pipeline.ask("What color is the sky?").await.unwrap();

    // The sky chunk outscores the grass chunk for a sky question.
    assert_eq!(answer.sources.len(), 2);
    assert!(answer.sources[0].text.contains("sky"));
    assert_eq!(answer.sources[0].page_number, 0);
    assert!(answer.sources[0].score > answer.sources[1].score);

    assert_eq!(
        answer.parsed,
        ParsedAnswer::Answered(vec![AnswerSentence {
            sentence: "The sky is blue.".to_string(),
            citation: "doc.pdf, page 0".to_string(),
        }])
    );
    assert!(answer.checks.iter().all(|c| c.verified));
}

#[tokio::test]
async fn empty_array_reply_means_unanswerable() {
    let pipeline = pipeline_with(Arc::new(KeywordEmbedder), Arc::new(StubModel::replying("[]")));
    pipeline.index_document(&sky_document()).await.unwrap();

    let answer = pipeline.ask("What is the capital of France?").await.unwrap();
    assert_eq!(answer.parsed, ParsedAnswer::Empty);
    assert!(answer.checks.is_empty());
    assert!(!answer.sources.is_empty(), "sources are still reported for transparency");
}

#[tokio::test]
async fn prose_reply_degrades_to_fallback_with_raw_text() {
    let reply = "I think the sky is blue, but I cannot emit JSON today.";
    let pipeline = pipeline_with(Arc::new(KeywordEmbedder), Arc::new(StubModel::replying(reply)));
    pipeline.index_document(&sky_document()).await.unwrap();

    let answer = pipeline.ask("What color is the sky?").await.unwrap();
    assert_eq!(answer.parsed, ParsedAnswer::Fallback { raw: reply.to_string() });
    assert!(answer.checks.is_empty());
}

#[tokio::test]
async fn hallucinated_citation_is_flagged_not_trusted() {
    let canned = r#"[{"sentence":"The sky is blue.","citation":"doc.pdf, page 9"}]"#;
    let pipeline =
        pipeline_with(Arc::new(KeywordEmbedder), Arc::new(StubModel::replying(canned)));
    pipeline.index_document(&sky_document()).await.unwrap();

    let answer = pipeline.ask("What color is the sky?").await.unwrap();
    assert!(matches!(answer.parsed, ParsedAnswer::Answered(_)));
    assert_eq!(answer.checks.len(), 1);
    assert!(!answer.checks[0].verified, "page 9 was never retrieved");
}

#[tokio::test]
async fn asking_before_indexing_is_an_index_empty_error() {
    let pipeline = pipeline_with(Arc::new(KeywordEmbedder), Arc::new(StubModel::replying("[]")));
    let err = pipeline.ask("anything").await.unwrap_err();
    assert!(matches!(err, RagError::IndexEmpty));
}

#[tokio::test]
async fn transient_embedding_failures_are_retried() {
    let pipeline = pipeline_with(
        Arc::new(FlakyEmbedder::failing(1)),
        Arc::new(StubModel::replying("[]")),
    );

    // First batch attempt hits the transient failure; the retry succeeds.
    let indexed = pipeline.index_document(&sky_document()).await.unwrap();
    assert_eq!(indexed, 2);
}

#[tokio::test]
async fn non_retryable_embedding_failures_surface_immediately() {
    let pipeline =
        pipeline_with(Arc::new(BrokenEmbedder), Arc::new(StubModel::replying("[]")));

    let err = pipeline.index_document(&sky_document()).await.unwrap_err();
    assert!(matches!(err, RagError::Pipeline(_)));
    assert!(err.to_string().contains("doc.pdf"));
}

#[tokio::test]
async fn top_k_is_clamped_to_index_size() {
    // Default top_k is 5 but only two chunks exist.
    let pipeline = pipeline_with(Arc::new(KeywordEmbedder), Arc::new(StubModel::replying("[]")));
    pipeline.index_document(&sky_document()).await.unwrap();

    let answer = pipeline.ask("What color is the sky?").await.unwrap();
    assert_eq!(answer.sources.len(), 2);
}

#[tokio::test]
async fn missing_builder_components_are_config_errors() {
    let result = QaPipeline::builder().config(RagConfig::default()).build();
    assert!(matches!(result, Err(RagError::Config(_))));
}
