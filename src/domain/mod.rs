mod chunk;
mod flashcard;
mod generation_parameters;
mod generation_request;
mod generation_run_id;
mod generation_state;
mod message;
mod message_role;
pub mod quiz_schema;
mod quiz_result;
mod raw_completion;
mod structured_quiz;

pub use chunk::TextChunk;
pub use flashcard::{Flashcard, FlashcardError, QUOTE_NOT_AVAILABLE};
pub use generation_parameters::{
    DEFAULT_HOSTED_ENDPOINT, DEFAULT_HOSTED_MODEL, DEFAULT_LOCAL_ENDPOINT, DEFAULT_LOCAL_MODEL,
    GenerationParameters, LlmBackend,
};
pub use generation_request::{
    GenerationRequest, RequestOverrides, ResponseFormat, SamplingParameters,
};
pub use generation_run_id::GenerationRunId;
pub use generation_state::GenerationState;
pub use message::ChatMessage;
pub use message_role::MessageRole;
pub use quiz_result::{QUIZ_NOTE_HEADER, QuizResult};
pub use raw_completion::RawCompletion;
pub use structured_quiz::{QuizEntry, SchemaQuiz, SchemaQuizEntry, StructuredQuiz};
