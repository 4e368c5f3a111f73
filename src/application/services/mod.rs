mod flashcard_normalizer;
mod prompt_builder;
mod pruning;
mod quiz_client;
mod quiz_extraction;
mod quiz_generator;
mod request_formatter;
mod response_repair;
mod single_flight;

pub use flashcard_normalizer::{FlashcardNormalizer, unescape_doubled_backslashes};
pub use prompt_builder::{DEFAULT_QUESTIONS_PER_CHUNK, PromptBuilder};
pub use pruning::{DEFAULT_PRUNE_TARGET, prune, prune_with};
pub use quiz_client::{DEFAULT_MAX_RETRIES, QuizClient, QuizClientError, repair_prompt};
pub use quiz_extraction::{ExtractionError, ExtractionStrategy, extract_quiz};
pub use quiz_generator::{
    ALREADY_RUNNING_NOTICE, GenerationError, GenerationOptions, QuizGenerator,
    RETRIES_EXHAUSTED_NOTICE,
};
pub use request_formatter::RequestFormatter;
pub use response_repair::{DEFAULT_REPAIRS, RepairTransform, repair};
pub use single_flight::{GenerationPermit, SingleFlight};
