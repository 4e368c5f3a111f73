use serde::{Deserialize, Serialize};

// The `Questions` rename must stay equal to `quiz_schema::QUESTIONS_FIELD`.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuiz {
    #[serde(rename = "Questions", alias = "questions", default)]
    pub questions: Vec<QuizEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizEntry {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_info: Option<String>,
}

impl StructuredQuiz {
    pub fn new(questions: Vec<QuizEntry>) -> Self {
        Self { questions }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuizEntry {
    pub fn new(question: &str, answer: &str, quote: &str) -> Self {
        Self {
            question: Some(question.to_string()),
            answer: Some(answer.to_string()),
            quote: Some(quote.to_string()),
            key_info: None,
        }
    }
}

/// Exact shape produced by schema-constrained backends. Decoding into it
/// rejects anything the schema would reject.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaQuiz {
    #[serde(rename = "Questions")]
    pub questions: Vec<SchemaQuizEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaQuizEntry {
    pub question: String,
    pub answer: String,
    pub quote: String,
}

impl From<SchemaQuiz> for StructuredQuiz {
    fn from(quiz: SchemaQuiz) -> Self {
        Self {
            questions: quiz
                .questions
                .into_iter()
                .map(|entry| QuizEntry {
                    question: Some(entry.question),
                    answer: Some(entry.answer),
                    quote: Some(entry.quote),
                    key_info: None,
                })
                .collect(),
        }
    }
}
