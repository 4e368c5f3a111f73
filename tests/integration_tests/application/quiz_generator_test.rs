use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Barrier, Notify, Semaphore};

use quizgen::application::ports::{LlmTransport, TransportError};
use quizgen::application::services::{
    ALREADY_RUNNING_NOTICE, GenerationError, GenerationOptions, QuizGenerator,
    RETRIES_EXHAUSTED_NOTICE, RequestFormatter,
};
use quizgen::domain::{GenerationParameters, GenerationRequest, GenerationState, RawCompletion};
use quizgen::infrastructure::document::StaticDocumentSource;
use quizgen::infrastructure::llm::MockTransport;
use quizgen::infrastructure::notification::CollectingNotifier;
use quizgen::infrastructure::text_processing::MarkdownSegmenter;

const PARIS_NOTE: &str = "The capital of France is Paris.";
const PARIS_QUIZ: &str = r#"{"Questions": [{"question": "What is the capital of France?", "answer": "Paris", "quote": "The capital of France is Paris."}]}"#;
const PARIS_CARD: &str =
    "What is the capital of France?\n?\nParis (Exact Quote: The capital of France is Paris.)";

struct Harness<T: LlmTransport> {
    generator: QuizGenerator<StaticDocumentSource, T>,
    transport: Arc<T>,
    notifier: Arc<CollectingNotifier>,
}

fn harness<T: LlmTransport>(
    document: StaticDocumentSource,
    transport: T,
    chunk_size: usize,
    options: GenerationOptions,
) -> Harness<T> {
    harness_with_parameters(
        document,
        transport,
        chunk_size,
        options,
        GenerationParameters::default(),
    )
}

fn harness_with_parameters<T: LlmTransport>(
    document: StaticDocumentSource,
    transport: T,
    chunk_size: usize,
    options: GenerationOptions,
    parameters: GenerationParameters,
) -> Harness<T> {
    let transport = Arc::new(transport);
    let notifier = Arc::new(CollectingNotifier::new());
    let generator = QuizGenerator::new(
        Arc::new(document),
        Arc::clone(&transport),
        Arc::new(MarkdownSegmenter::new(chunk_size)),
        notifier.clone(),
        RequestFormatter::new(parameters),
        options,
    );
    Harness {
        generator,
        transport,
        notifier,
    }
}

/// Blocks inside `send` until the test adds a permit.
struct GatedTransport {
    entered: Notify,
    release: Semaphore,
    completion: String,
}

#[async_trait::async_trait]
impl LlmTransport for GatedTransport {
    async fn send(&self, _request: &GenerationRequest) -> Result<RawCompletion, TransportError> {
        self.entered.notify_one();
        let _permit = self
            .release
            .acquire()
            .await
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;
        Ok(RawCompletion::new(self.completion.clone()))
    }
}

/// Every `send` waits until `parties` calls are in flight at once.
struct BarrierTransport {
    barrier: Barrier,
}

impl BarrierTransport {
    fn new(parties: usize) -> Self {
        Self {
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait::async_trait]
impl LlmTransport for BarrierTransport {
    async fn send(&self, _request: &GenerationRequest) -> Result<RawCompletion, TransportError> {
        self.barrier.wait().await;
        Ok(RawCompletion::new(PARIS_QUIZ))
    }
}

#[tokio::test]
async fn given_single_chunk_note_when_generating_then_returns_grounded_card() {
    let h = harness(
        StaticDocumentSource::new(PARIS_NOTE),
        MockTransport::repeating(PARIS_QUIZ),
        2000,
        GenerationOptions::default(),
    );

    let result = h.generator.generate().await.unwrap();

    assert_eq!(result.rendered_cards(), vec![PARIS_CARD.to_string()]);
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(h.generator.state(), GenerationState::Completed);
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn given_topic_note_when_generating_then_renders_quoted_card_without_double_quotes() {
    let h = harness(
        StaticDocumentSource::new(
            "# Topic\nParis is the capital of France. It has 2.1M residents.",
        ),
        MockTransport::repeating(
            r#"{"Questions":[{"question":"What is the capital of France?","answer":"Paris.","quote":"Paris is the capital of France."}]}"#,
        ),
        2000,
        GenerationOptions::default(),
    );

    let result = h.generator.generate().await.unwrap();

    assert_eq!(h.transport.call_count(), 1);
    let cards = result.rendered_cards();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].contains("Paris."));
    assert!(cards[0].contains("Paris is the capital of France."));
    assert!(!cards[0].contains('"'));
}

#[tokio::test]
async fn given_trailing_comma_then_valid_completion_when_generating_with_schema_then_repairs_once()
 {
    let h = harness_with_parameters(
        StaticDocumentSource::new(PARIS_NOTE),
        MockTransport::from_completions([
            r#"{"Questions": [{"question": "What is the capital of France?", "answer": "Paris", "quote": "The capital of France is Paris."},]}"#,
            PARIS_QUIZ,
        ]),
        2000,
        GenerationOptions::default(),
        GenerationParameters {
            structured_output: true,
            ..GenerationParameters::default()
        },
    );

    let result = h.generator.generate().await.unwrap();

    assert_eq!(result.rendered_cards(), vec![PARIS_CARD.to_string()]);
    assert_eq!(h.transport.call_count(), 2);
    let requests = h.transport.requests();
    assert!(
        requests[1]
            .prompt_message()
            .content
            .starts_with("This is not a correct json!")
    );
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test]
async fn given_generated_quiz_when_rendering_note_then_has_flashcards_header() {
    let h = harness(
        StaticDocumentSource::new(PARIS_NOTE),
        MockTransport::repeating(PARIS_QUIZ),
        2000,
        GenerationOptions::default(),
    );

    let note = h.generator.generate().await.unwrap().to_markdown();

    assert_eq!(
        note,
        format!("# Generated Quiz\n\n#flashcards\n\n{}\n", PARIS_CARD)
    );
}

#[tokio::test]
async fn given_multi_section_note_when_generating_then_sends_one_request_per_chunk() {
    let note = "# One\nThe capital of France is Paris.\n# Two\nThe capital of France is Paris.";
    let h = harness(
        StaticDocumentSource::new(note),
        MockTransport::repeating(PARIS_QUIZ),
        40,
        GenerationOptions::default(),
    );

    let result = h.generator.generate().await.unwrap();

    assert_eq!(h.transport.call_count(), 2);
    assert_eq!(result.len(), 2);
    for request in h.transport.requests() {
        assert!(request.prompt_message().content.contains("Text: # "));
    }
}

#[tokio::test]
async fn given_three_chunks_when_generating_then_dispatches_them_concurrently() {
    let note = "# One\nThe capital of France is Paris.\n\
                # Two\nThe capital of France is Paris.\n\
                # Three\nThe capital of France is Paris.";
    let h = harness(
        StaticDocumentSource::new(note),
        BarrierTransport::new(3),
        40,
        GenerationOptions::default(),
    );

    let result = tokio::time::timeout(Duration::from_secs(5), h.generator.generate())
        .await
        .expect("chunk requests must all be in flight together")
        .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(h.generator.state(), GenerationState::Completed);
}

#[tokio::test]
async fn given_run_in_flight_when_generating_again_then_rejects_and_notifies() {
    let transport = GatedTransport {
        entered: Notify::new(),
        release: Semaphore::new(0),
        completion: PARIS_QUIZ.to_string(),
    };
    let h = harness(
        StaticDocumentSource::new(PARIS_NOTE),
        transport,
        2000,
        GenerationOptions::default(),
    );

    let (first, second) = tokio::join!(h.generator.generate(), async {
        h.transport.entered.notified().await;
        assert_eq!(h.generator.state(), GenerationState::Generating);
        let second = h.generator.generate().await;
        h.transport.release.add_permits(1);
        second
    });

    assert!(matches!(second, Err(GenerationError::AlreadyRunning)));
    assert_eq!(first.unwrap().len(), 1);
    assert_eq!(h.notifier.messages(), vec![ALREADY_RUNNING_NOTICE.to_string()]);
    assert_eq!(h.generator.state(), GenerationState::Completed);
}

#[tokio::test]
async fn given_always_malformed_completions_when_generating_then_notifies_and_releases_guard() {
    let h = harness(
        StaticDocumentSource::new(PARIS_NOTE),
        MockTransport::repeating("I cannot produce JSON today"),
        2000,
        GenerationOptions::default(),
    );

    let result = h.generator.generate().await.unwrap();

    assert!(result.is_empty());
    assert_eq!(h.transport.call_count(), 3);
    assert_eq!(
        h.notifier.messages(),
        vec![RETRIES_EXHAUSTED_NOTICE.to_string()]
    );
    assert!(!h.generator.state().is_in_flight());

    let retry = h.generator.generate().await;

    assert!(retry.is_ok());
    assert_eq!(h.transport.call_count(), 6);
}

#[tokio::test]
async fn given_no_active_document_when_generating_then_returns_empty_without_requests() {
    let h = harness(
        StaticDocumentSource::absent(),
        MockTransport::repeating(PARIS_QUIZ),
        2000,
        GenerationOptions::default(),
    );

    let result = h.generator.generate().await.unwrap();

    assert!(result.is_empty());
    assert_eq!(h.transport.call_count(), 0);
    assert!(!h.generator.state().is_in_flight());
}

#[tokio::test]
async fn given_transport_failure_when_generating_then_fails_and_releases_guard() {
    let h = harness(
        StaticDocumentSource::new(PARIS_NOTE),
        MockTransport::new([Err(TransportError::RateLimited)]),
        2000,
        GenerationOptions::default(),
    );

    let result = h.generator.generate().await;

    assert!(matches!(
        result,
        Err(GenerationError::Transport(TransportError::RateLimited))
    ));
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(h.generator.state(), GenerationState::Failed);
}

#[tokio::test]
async fn given_many_cards_and_pruning_when_generating_then_keeps_ten() {
    let entries: Vec<String> = (0..14)
        .map(|i| {
            format!(
                r#"{{"question": "Question {i}?", "answer": "Answer {i}", "quote": "The capital of France is Paris."}}"#
            )
        })
        .collect();
    let completion = format!(r#"{{"Questions": [{}]}}"#, entries.join(", "));
    let h = harness(
        StaticDocumentSource::new(PARIS_NOTE),
        MockTransport::repeating(completion),
        2000,
        GenerationOptions {
            prune_enabled: true,
            ..GenerationOptions::default()
        },
    );

    let result = h.generator.generate().await.unwrap();

    assert_eq!(result.len(), 10);
    for card in &result.flashcards {
        assert!(card.question().starts_with("Question "));
    }
}

#[tokio::test]
async fn given_few_cards_and_pruning_when_generating_then_keeps_all() {
    let h = harness(
        StaticDocumentSource::new(PARIS_NOTE),
        MockTransport::repeating(PARIS_QUIZ),
        2000,
        GenerationOptions {
            prune_enabled: true,
            ..GenerationOptions::default()
        },
    );

    assert_eq!(h.generator.generate().await.unwrap().len(), 1);
}
