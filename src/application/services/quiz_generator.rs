use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::Instrument;

use super::pruning::{DEFAULT_PRUNE_TARGET, prune};
use super::quiz_client::{DEFAULT_MAX_RETRIES, QuizClient, QuizClientError};
use super::{
    DEFAULT_QUESTIONS_PER_CHUNK, FlashcardNormalizer, GenerationPermit, PromptBuilder,
    RequestFormatter, SingleFlight,
};
use crate::application::ports::{
    DocumentSource, LlmTransport, Notifier, TextSplitter, TransportError,
};
use crate::domain::{
    Flashcard, GenerationRunId, GenerationState, MessageRole, QuizResult, TextChunk,
};

pub const ALREADY_RUNNING_NOTICE: &str = "There is already another generation process";
pub const RETRIES_EXHAUSTED_NOTICE: &str = "We are having trouble creating the quiz, some part of the text might not have flashcards. Please try again by selecting a specific part of the text.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    pub questions_per_chunk: Option<usize>,
    pub max_retries: u32,
    pub prune_enabled: bool,
    pub prune_target: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            questions_per_chunk: Some(DEFAULT_QUESTIONS_PER_CHUNK),
            max_retries: DEFAULT_MAX_RETRIES,
            prune_enabled: false,
            prune_target: DEFAULT_PRUNE_TARGET,
        }
    }
}

pub struct QuizGenerator<D, T>
where
    D: DocumentSource + ?Sized,
    T: LlmTransport + ?Sized,
{
    document_source: Arc<D>,
    text_splitter: Arc<dyn TextSplitter>,
    notifier: Arc<dyn Notifier>,
    quiz_client: QuizClient<T>,
    prompt_builder: PromptBuilder,
    request_formatter: RequestFormatter,
    normalizer: FlashcardNormalizer,
    options: GenerationOptions,
    single_flight: SingleFlight,
}

impl<D, T> QuizGenerator<D, T>
where
    D: DocumentSource + ?Sized,
    T: LlmTransport + ?Sized,
{
    pub fn new(
        document_source: Arc<D>,
        transport: Arc<T>,
        text_splitter: Arc<dyn TextSplitter>,
        notifier: Arc<dyn Notifier>,
        request_formatter: RequestFormatter,
        options: GenerationOptions,
    ) -> Self {
        Self {
            document_source,
            text_splitter,
            notifier,
            quiz_client: QuizClient::new(transport, options.max_retries),
            prompt_builder: PromptBuilder::new(options.questions_per_chunk),
            request_formatter,
            normalizer: FlashcardNormalizer::new(),
            options,
            single_flight: SingleFlight::new(),
        }
    }

    pub fn state(&self) -> GenerationState {
        self.single_flight.state()
    }

    pub async fn generate(&self) -> Result<QuizResult, GenerationError> {
        let Some(permit) = self.single_flight.try_acquire() else {
            tracing::warn!("Rejected generation: another generation is in flight");
            self.notifier.notify(ALREADY_RUNNING_NOTICE);
            return Err(GenerationError::AlreadyRunning);
        };

        let run_id = GenerationRunId::new();
        let span = tracing::info_span!(
            "generation_run",
            run_id = %run_id,
            schema_version = self.prompt_builder.schema_version()
        );
        self.run(run_id, permit).instrument(span).await
    }

    async fn run(
        &self,
        run_id: GenerationRunId,
        permit: GenerationPermit<'_>,
    ) -> Result<QuizResult, GenerationError> {
        let Some(text) = self.document_source.current_text().await else {
            tracing::info!("No active document, nothing to generate");
            permit.fail();
            return Ok(QuizResult::empty(run_id));
        };

        let chunks = self.text_splitter.split(&text);
        tracing::info!(chunks = chunks.len(), "Document segmented");

        let mut pending: FuturesUnordered<_> = chunks
            .iter()
            .map(|chunk| {
                let span = tracing::debug_span!("chunk", index = chunk.index);
                self.process_chunk(chunk).instrument(span)
            })
            .collect();

        let mut flashcards = Vec::new();
        let mut transport_failure: Option<TransportError> = None;

        while let Some((index, outcome)) = pending.next().await {
            match outcome {
                Ok(cards) => {
                    tracing::debug!(chunk = index, cards = cards.len(), "Chunk completed");
                    flashcards.extend(cards);
                }
                Err(QuizClientError::RetriesExhausted {
                    attempts,
                    last_error,
                }) => {
                    tracing::warn!(
                        chunk = index,
                        attempts = attempts,
                        error = %last_error,
                        "Chunk produced no flashcards"
                    );
                    self.notifier.notify(RETRIES_EXHAUSTED_NOTICE);
                }
                Err(QuizClientError::Transport(error)) => {
                    tracing::error!(chunk = index, error = %error, "Transport failure");
                    transport_failure.get_or_insert(error);
                }
            }
        }
        drop(pending);

        if let Some(error) = transport_failure {
            permit.fail();
            return Err(GenerationError::Transport(error));
        }

        let generated = flashcards.len();
        let flashcards = if self.options.prune_enabled {
            prune(flashcards, self.options.prune_target)
        } else {
            flashcards
        };

        tracing::info!(
            generated = generated,
            kept = flashcards.len(),
            "Generation completed"
        );
        permit.complete();
        Ok(QuizResult::new(run_id, flashcards))
    }

    async fn process_chunk(
        &self,
        chunk: &TextChunk,
    ) -> (usize, Result<Vec<Flashcard>, QuizClientError>) {
        let prompt = self.prompt_builder.build_prompt(&chunk.text);
        let request = self
            .request_formatter
            .prepare_request(&prompt, MessageRole::User);

        let outcome = self
            .quiz_client
            .get_quiz(&request)
            .await
            .map(|quiz| self.normalizer.normalize_grounded(quiz, &chunk.text));

        (chunk.index, outcome)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("another generation is already in flight")]
    AlreadyRunning,
    #[error("transport: {0}")]
    Transport(TransportError),
}
