use serde_json::Value;

use super::response_repair::{DEFAULT_REPAIRS, repair};
use crate::domain::quiz_schema::QUESTIONS_FIELD;
use crate::domain::{QuizEntry, ResponseFormat, SchemaQuiz, StructuredQuiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Typed decode against the quiz schema; no rewriting.
    Schema,
    /// Repair transforms, generic parse, then a hand-rolled shape check.
    Permissive,
}

impl ExtractionStrategy {
    pub fn for_format(format: ResponseFormat) -> Self {
        if format.is_schema_constrained() {
            ExtractionStrategy::Schema
        } else {
            ExtractionStrategy::Permissive
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("schema violation: {0}")]
    SchemaViolation(String),
    #[error("unexpected shape: {0}")]
    UnexpectedShape(String),
}

pub fn extract_quiz(
    raw: &str,
    strategy: ExtractionStrategy,
) -> Result<StructuredQuiz, ExtractionError> {
    match strategy {
        ExtractionStrategy::Schema => extract_with_schema(raw),
        ExtractionStrategy::Permissive => extract_permissive(raw),
    }
}

fn extract_with_schema(raw: &str) -> Result<StructuredQuiz, ExtractionError> {
    serde_json::from_str::<SchemaQuiz>(raw.trim())
        .map(StructuredQuiz::from)
        .map_err(|e| match e.classify() {
            serde_json::error::Category::Data => ExtractionError::SchemaViolation(e.to_string()),
            _ => ExtractionError::InvalidJson(e.to_string()),
        })
}

fn extract_permissive(raw: &str) -> Result<StructuredQuiz, ExtractionError> {
    let repaired = repair(raw, &DEFAULT_REPAIRS);
    let value: Value =
        serde_json::from_str(&repaired).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(ExtractionError::UnexpectedShape(
            "top-level value is not an object".to_string(),
        ));
    };

    if object.is_empty() {
        return Ok(StructuredQuiz::empty());
    }

    let questions = object
        .remove(QUESTIONS_FIELD)
        .or_else(|| object.remove(&QUESTIONS_FIELD.to_lowercase()))
        .ok_or_else(|| {
            ExtractionError::UnexpectedShape(format!("missing {} array", QUESTIONS_FIELD))
        })?;

    let Value::Array(entries) = questions else {
        return Err(ExtractionError::UnexpectedShape(format!(
            "{} is not an array",
            QUESTIONS_FIELD
        )));
    };

    let entries = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<QuizEntry>(entry) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed quiz entry");
                None
            }
        })
        .collect();

    Ok(StructuredQuiz::new(entries))
}
