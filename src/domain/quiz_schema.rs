//! The flashcard contract shared by the prompt builder and the response
//! validator. Bump [`QUIZ_SCHEMA_VERSION`] whenever a field changes.

use serde_json::{Map, Value, json};

pub const QUIZ_SCHEMA_VERSION: &str = "3";
pub const SCHEMA_NAME: &str = "flashcard_quiz";

pub const QUESTIONS_FIELD: &str = "Questions";
pub const QUESTION_FIELD: &str = "question";
pub const ANSWER_FIELD: &str = "answer";
pub const QUOTE_FIELD: &str = "quote";
/// Earlier contract revisions carried the source excerpt under this name.
pub const LEGACY_QUOTE_FIELD: &str = "key_info";

pub const SYSTEM_PROMPT: &str = "You are an Anki flashcard generator.";

fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// JSON Schema for constrained-output backends.
pub fn json_schema() -> Value {
    let mut entry_properties = Map::new();
    entry_properties.insert(
        QUESTION_FIELD.to_string(),
        string_property("A self-contained question answerable from the text"),
    );
    entry_properties.insert(
        ANSWER_FIELD.to_string(),
        string_property("The answer, markdown formatted"),
    );
    entry_properties.insert(
        QUOTE_FIELD.to_string(),
        string_property("A verbatim excerpt of the text supporting the answer"),
    );

    let entry = json!({
        "type": "object",
        "properties": Value::Object(entry_properties),
        "required": [QUESTION_FIELD, ANSWER_FIELD, QUOTE_FIELD],
        "additionalProperties": false,
    });

    let mut properties = Map::new();
    properties.insert(
        QUESTIONS_FIELD.to_string(),
        json!({ "type": "array", "items": entry }),
    );

    json!({
        "type": "object",
        "properties": Value::Object(properties),
        "required": [QUESTIONS_FIELD],
        "additionalProperties": false,
    })
}

/// Human-readable description of the expected output, embedded in prompts.
pub fn schema_description() -> String {
    format!(
        r#"{{"{questions}": [{{"{question}": "What are the obitore?", "{answer}": "A community from south west Asia known for selling erasers.", "{quote}": "The obitore are a community from the south west of Asia that are selling erasers"}}]}}"#,
        questions = QUESTIONS_FIELD,
        question = QUESTION_FIELD,
        answer = ANSWER_FIELD,
        quote = QUOTE_FIELD,
    )
}
