use quizgen::application::services::{DEFAULT_REPAIRS, RepairTransform, repair};

#[test]
fn given_code_fenced_json_when_repairing_then_strips_fence() {
    let raw = "```json\n{\"Questions\": []}\n```";

    assert_eq!(repair(raw, &DEFAULT_REPAIRS), "{\"Questions\": []}");
}

#[test]
fn given_output_markers_when_repairing_then_removes_them() {
    let raw = "[OUTPUT]{\"Questions\": []}[INPUT]";

    assert_eq!(repair(raw, &DEFAULT_REPAIRS), "{\"Questions\": []}");
}

#[test]
fn given_surrounding_prose_when_repairing_then_keeps_json_envelope() {
    let raw = "Sure! Here is your quiz: {\"Questions\": []} Hope it helps.";

    assert_eq!(repair(raw, &DEFAULT_REPAIRS), "{\"Questions\": []}");
}

#[test]
fn given_trailing_commas_when_repairing_then_removes_them() {
    let raw = "{\"Questions\": [{\"question\": \"q\",}, ],}";

    let repaired = repair(raw, &DEFAULT_REPAIRS);

    assert_eq!(repaired, "{\"Questions\": [{\"question\": \"q\"} ]}");
    assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());
}

#[test]
fn given_latex_backslashes_when_repairing_then_escapes_them() {
    let raw = r#"{"answer": "$\frac{a}{b}$ and \alpha"}"#;

    let repaired = repair(raw, &DEFAULT_REPAIRS);
    let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();

    assert_eq!(value["answer"], r"$\frac{a}{b}$ and \alpha");
}

#[test]
fn given_latex_commands_starting_with_n_when_repairing_then_keeps_them() {
    let raw = r#"{"answer": "$a \neq b$, $\nu > 0$ and $\nabla f$"}"#;

    let repaired = repair(raw, &DEFAULT_REPAIRS);
    let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();

    assert_eq!(value["answer"], r"$a \neq b$, $\nu > 0$ and $\nabla f$");
}

#[test]
fn given_newline_escape_before_non_letter_when_repairing_then_keeps_newline() {
    let raw = r#"{"answer": "first\n- second"}"#;

    let repaired = repair(raw, &DEFAULT_REPAIRS);
    let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();

    assert_eq!(value["answer"], "first\n- second");
}

#[test]
fn given_code_block_inside_answer_when_repairing_then_keeps_its_fences() {
    let raw = "```json\n{\"answer\": \"Use:\\n```rust\\n    println!()\\n```\"}\n```";

    let repaired = repair(raw, &DEFAULT_REPAIRS);
    let value: serde_json::Value = serde_json::from_str(&repaired).unwrap();

    assert_eq!(value["answer"], "Use:\n```rust\n    println!()\n```");
}

#[test]
fn given_valid_escapes_when_repairing_then_leaves_them_alone() {
    let raw = r#"{"answer": "line\n 2 \"quoted\" é a\\b"}"#;

    assert_eq!(
        RepairTransform::EscapeStrayBackslashes.apply(raw),
        std::borrow::Cow::Borrowed(raw)
    );
}

#[test]
fn given_only_smart_quotes_when_repairing_then_normalizes_them() {
    let raw = "{\u{201C}Questions\u{201D}: []}";

    assert_eq!(repair(raw, &DEFAULT_REPAIRS), "{\"Questions\": []}");
}

#[test]
fn given_mixed_quotes_when_repairing_then_keeps_smart_quotes_in_values() {
    let raw = "{\"answer\": \"He said \u{201C}hi\u{201D}\"}";

    assert_eq!(
        RepairTransform::NormalizeSmartQuotes.apply(raw),
        std::borrow::Cow::Borrowed(raw)
    );
}

#[test]
fn given_no_transforms_when_repairing_then_only_trims() {
    assert_eq!(repair("  {} ", &[]), "{}");
}
