pub const QUOTE_NOT_AVAILABLE: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Flashcard {
    question: String,
    answer: String,
    quote: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlashcardError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("answer is empty")]
    EmptyAnswer,
    #[error("answer is the literal null")]
    NullAnswer,
}

impl Flashcard {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        quote: Option<String>,
    ) -> Result<Self, FlashcardError> {
        let question = question.into().trim().to_string();
        let answer = answer.into().trim().to_string();

        if question.is_empty() {
            return Err(FlashcardError::EmptyQuestion);
        }
        if answer.is_empty() {
            return Err(FlashcardError::EmptyAnswer);
        }
        if answer.eq_ignore_ascii_case("null") {
            return Err(FlashcardError::NullAnswer);
        }

        let quote = quote
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| QUOTE_NOT_AVAILABLE.to_string());

        Ok(Self {
            question,
            answer,
            quote,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn has_quote(&self) -> bool {
        self.quote != QUOTE_NOT_AVAILABLE
    }

    /// Card text in the `question / ? / answer` layout. Double quotes are
    /// JSON leftovers and never survive rendering.
    pub fn render(&self) -> String {
        format!(
            "{}\n?\n{} (Exact Quote: \"{}\")",
            self.question, self.answer, self.quote
        )
        .replace('"', "")
    }
}
