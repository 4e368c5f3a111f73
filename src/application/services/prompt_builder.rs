use crate::domain::quiz_schema::{
    QUESTIONS_FIELD, QUIZ_SCHEMA_VERSION, QUOTE_FIELD, schema_description,
};

pub const DEFAULT_QUESTIONS_PER_CHUNK: usize = 7;

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    questions_per_chunk: Option<usize>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(Some(DEFAULT_QUESTIONS_PER_CHUNK))
    }
}

impl PromptBuilder {
    pub fn new(questions_per_chunk: Option<usize>) -> Self {
        Self {
            questions_per_chunk: questions_per_chunk.filter(|n| *n > 0),
        }
    }

    /// The prompt embeds the quiz schema, so it is versioned with it.
    pub fn schema_version(&self) -> &'static str {
        QUIZ_SCHEMA_VERSION
    }

    pub fn build_prompt(&self, chunk_text: &str) -> String {
        let count_hint = match self.questions_per_chunk {
            Some(n) => format!("Give up to {n} sets of question/answer"),
            None => "Give sets of question/answer".to_string(),
        };

        format!(
            "{count_hint} for Anki cards based uniquely on the text below, as JSON in the following format:\n\
             {schema}\n\
             The {quote} property must be an exact quote from the given text.\n\
             If a question depends on a specific context or condition, state it in the question.\n\
             Attribute names and string values MUST use double quotes.\n\
             Every answer must be found in the text: do not add outside information, forget every exterior knowledge, \
             but give elaborate answers (you may rephrase).\n\
             The text is written in markdown and can contain mathematical formulas, so answers must be markdown compatible.\n\
             If the text does not hold enough information, return {{\"{questions}\": []}}.\n\
             Text: {chunk_text}",
            schema = schema_description(),
            quote = QUOTE_FIELD,
            questions = QUESTIONS_FIELD,
        )
    }
}
