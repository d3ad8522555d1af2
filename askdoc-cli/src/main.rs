//! Interactive cited question answering over a single document.
//!
//! Loads a document, builds the in-memory index once, then serves an
//! `Ask:` prompt until `exit`/`quit`/`q` (or EOF). Answers print as
//! pretty JSON with per-sentence citations; output that fails the strict
//! parse prints as-is behind a warning. Per-question errors never kill
//! the session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use askdoc_rag::{
    Answer, DocumentSource, FixedSizeChunker, InMemoryIndex, OpenAIChatModel,
    OpenAIEmbeddingProvider, ParsedAnswer, PdfSource, QaPipeline, RagConfig, TextSource,
};

#[derive(Parser, Debug)]
#[command(name = "askdoc", about = "Ask questions about a document and get cited JSON answers")]
struct Args {
    /// Document to ingest (.pdf, or any UTF-8 text file).
    path: PathBuf,

    /// Chat model used to generate answers.
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Embedding model used for indexing and retrieval.
    #[arg(long, default_value = "text-embedding-3-small")]
    embedding_model: String,

    /// Number of passages to retrieve per question.
    #[arg(long, default_value_t = 5)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    // The composition root performs the only ambient read: the key is
    // resolved once here and passed down explicitly.
    let api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;

    let config = RagConfig::builder()
        .chunk_size(800)
        .chunk_overlap(100)
        .top_k(args.top_k)
        .model_name(&args.model)
        .embedding_model(&args.embedding_model)
        .temperature(0.0)
        .build()?;

    let source: Box<dyn DocumentSource> = match args.path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => Box::new(PdfSource),
        _ => Box::new(TextSource),
    };
    let document = source.load(&args.path)?;

    let chunker = FixedSizeChunker::new(config.chunk_size, config.chunk_overlap)?;
    let embedder = OpenAIEmbeddingProvider::new(&api_key, &config.embedding_model)?;
    let model = OpenAIChatModel::new(&api_key, &config.model_name, config.temperature)?;

    let pipeline = QaPipeline::builder()
        .config(config)
        .chunker(Arc::new(chunker))
        .embedding_provider(Arc::new(embedder))
        .index(Arc::new(InMemoryIndex::new()))
        .model(Arc::new(model))
        .build()?;

    let chunk_count = pipeline.index_document(&document).await?;
    println!(
        "Indexed {chunk_count} chunks from {}. Ask away, or type 'exit' to quit.\n",
        document.source_name
    );

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("Ask: ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                if matches!(question.to_lowercase().as_str(), "exit" | "quit" | "q") {
                    break;
                }
                let _ = editor.add_history_entry(question);

                // Per-question errors are reported and the loop keeps
                // serving; only startup errors are fatal.
                match pipeline.ask(question).await {
                    Ok(answer) => print_answer(&answer)?,
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn print_answer(answer: &Answer) -> Result<()> {
    match &answer.parsed {
        ParsedAnswer::Answered(sentences) => {
            println!("\n=== Parsed JSON Output ===");
            println!("{}", serde_json::to_string_pretty(sentences)?);
            for check in &answer.checks {
                if !check.verified {
                    println!(
                        "[WARN] Citation does not match any retrieved passage: {}",
                        check.citation
                    );
                }
            }
        }
        ParsedAnswer::Empty => {
            println!("\n[] (the context does not answer this question)");
        }
        ParsedAnswer::Fallback { raw } => {
            println!("\n[WARN] Could not parse JSON. Raw output below:\n");
            println!("{raw}");
        }
    }

    println!("\n=== Retrieved Sources ===");
    for source in &answer.sources {
        println!("- {} p.{}", source.source_name, source.page_number);
    }
    println!("\n---\n");

    Ok(())
}
