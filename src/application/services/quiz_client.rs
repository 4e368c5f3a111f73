use std::sync::Arc;

use super::quiz_extraction::{ExtractionError, ExtractionStrategy, extract_quiz};
use crate::application::ports::{LlmTransport, TransportError};
use crate::domain::{GenerationRequest, RawCompletion, StructuredQuiz};
use crate::infrastructure::observability::sanitize_prompt;

pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Completion client that asks the backend to fix its own malformed output,
/// at most `max_retries` times after the first attempt.
pub struct QuizClient<T: ?Sized> {
    transport: Arc<T>,
    max_retries: u32,
}

impl<T> QuizClient<T>
where
    T: LlmTransport + ?Sized,
{
    pub fn new(transport: Arc<T>, max_retries: u32) -> Self {
        Self {
            transport,
            max_retries,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub async fn get_quiz(
        &self,
        request: &GenerationRequest,
    ) -> Result<StructuredQuiz, QuizClientError> {
        let strategy = ExtractionStrategy::for_format(request.response_format);
        let mut current = request.clone();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let raw = self
                .transport
                .send(&current)
                .await
                .map_err(QuizClientError::Transport)?;

            tracing::debug!(
                attempt = attempt,
                completion = %sanitize_prompt(raw.as_str()),
                "Received completion"
            );

            let error = match extract_quiz(raw.as_str(), strategy) {
                Ok(quiz) => {
                    if attempt > 1 {
                        tracing::info!(attempts = attempt, "Recovered quiz after repair");
                    }
                    return Ok(quiz);
                }
                Err(error) => error,
            };

            if attempt > self.max_retries {
                tracing::warn!(
                    attempts = attempt,
                    error = %error,
                    "Giving up on malformed completion"
                );
                return Err(QuizClientError::RetriesExhausted {
                    attempts: attempt,
                    last_error: error,
                });
            }

            tracing::warn!(
                attempt = attempt,
                error = %error,
                "Completion is not a valid quiz, requesting a corrected version"
            );
            current = current.with_prompt(repair_prompt(&error, &raw));
        }
    }
}

pub fn repair_prompt(error: &ExtractionError, raw: &RawCompletion) -> String {
    format!(
        "This is not a correct json! Return a corrected version of it (to help you, the error is: {}): {}",
        error, raw
    )
}

#[derive(Debug, thiserror::Error)]
pub enum QuizClientError {
    #[error("transport: {0}")]
    Transport(TransportError),
    #[error("no valid quiz after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: u32,
        last_error: ExtractionError,
    },
}
