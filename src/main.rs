use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};

use quizgen::application::services::{QuizGenerator, RequestFormatter};
use quizgen::infrastructure::document::MarkdownFileSource;
use quizgen::infrastructure::llm::OpenAiCompatibleTransport;
use quizgen::infrastructure::notification::TracingNotifier;
use quizgen::infrastructure::observability::{TracingConfig, init_tracing};
use quizgen::infrastructure::text_processing::MarkdownSegmenter;
use quizgen::presentation::{Environment, Settings};

const USAGE: &str = "usage: quizgen <markdown-file> [output-file]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?);
    let output = args.next().map(PathBuf::from);

    let environment = Environment::from_env().map_err(|e| anyhow!(e))?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        TracingConfig::default()
            .with_level(settings.logging.level.clone())
            .with_json_format(settings.logging.json),
    )
    .context("Failed to initialize tracing")?;
    tracing::info!(
        environment = %environment,
        backend = ?settings.llm.backend,
        "Configuration loaded"
    );

    let notifier = Arc::new(TracingNotifier);
    let document_source =
        Arc::new(MarkdownFileSource::new(&input).with_notifier(notifier.clone()));
    let transport = Arc::new(
        OpenAiCompatibleTransport::new(settings.request_timeout())
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?,
    );
    let generator = QuizGenerator::new(
        Arc::clone(&document_source),
        transport,
        Arc::new(MarkdownSegmenter::new(settings.generation.chunk_size)),
        notifier,
        RequestFormatter::new(settings.generation_parameters()),
        settings.generation_options(),
    );

    let quiz = generator.generate().await.context("Generation failed")?;

    if quiz.is_empty() {
        tracing::warn!(input = %input.display(), "No flashcards were generated");
        return Ok(());
    }

    let output =
        output.unwrap_or_else(|| default_output_path(&input, &document_source.quiz_title()));
    tokio::fs::write(&output, quiz.to_markdown())
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        flashcards = quiz.len(),
        "Quiz written"
    );
    Ok(())
}

fn default_output_path(input: &Path, title: &str) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{}.md", title))
}
