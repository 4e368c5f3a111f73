use std::sync::Arc;

use quizgen::application::ports::TransportError;
use quizgen::application::services::{QuizClient, QuizClientError, RequestFormatter};
use quizgen::domain::{GenerationParameters, GenerationRequest, MessageRole, RawCompletion};
use quizgen::infrastructure::llm::MockTransport;

const PARIS_QUIZ: &str = r#"{"Questions": [{"question": "What is the capital of France?", "answer": "Paris", "quote": "The capital of France is Paris."}]}"#;
const TRUNCATED_QUIZ: &str = r#"{"Questions": [{"question": "What is"#;

fn request() -> GenerationRequest {
    RequestFormatter::new(GenerationParameters::default())
        .prepare_request("Make flashcards", MessageRole::User)
}

#[tokio::test]
async fn given_valid_completion_when_getting_quiz_then_returns_on_first_attempt() {
    let transport = Arc::new(MockTransport::from_completions([PARIS_QUIZ]));
    let client = QuizClient::new(Arc::clone(&transport), 2);

    let quiz = client.get_quiz(&request()).await.unwrap();

    assert_eq!(quiz.len(), 1);
    assert_eq!(quiz.questions[0].answer.as_deref(), Some("Paris"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn given_malformed_then_valid_completion_when_getting_quiz_then_repairs_once() {
    let transport = Arc::new(MockTransport::from_completions([TRUNCATED_QUIZ, PARIS_QUIZ]));
    let client = QuizClient::new(Arc::clone(&transport), 2);

    let quiz = client.get_quiz(&request()).await.unwrap();

    assert_eq!(quiz.len(), 1);
    assert_eq!(transport.call_count(), 2);

    let requests = transport.requests();
    let repair = requests[1].prompt_message();
    assert!(repair.content.starts_with("This is not a correct json!"));
    assert!(repair.content.ends_with(TRUNCATED_QUIZ));
    assert_eq!(repair.role, MessageRole::User);
    assert_eq!(requests[1].model, requests[0].model);
}

#[tokio::test]
async fn given_always_malformed_completion_when_getting_quiz_then_stops_after_retries() {
    let transport = Arc::new(MockTransport::repeating("definitely not json"));
    let client = QuizClient::new(Arc::clone(&transport), 2);

    let result = client.get_quiz(&request()).await;

    match result {
        Err(QuizClientError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn given_zero_retries_when_completion_is_malformed_then_makes_single_attempt() {
    let transport = Arc::new(MockTransport::repeating("nope"));
    let client = QuizClient::new(Arc::clone(&transport), 0);

    let result = client.get_quiz(&request()).await;

    assert!(matches!(
        result,
        Err(QuizClientError::RetriesExhausted { attempts: 1, .. })
    ));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn given_transport_error_when_getting_quiz_then_fails_without_retry() {
    let transport = Arc::new(MockTransport::new([
        Err(TransportError::RateLimited),
        Ok(RawCompletion::new(PARIS_QUIZ)),
    ]));
    let client = QuizClient::new(Arc::clone(&transport), 2);

    let result = client.get_quiz(&request()).await;

    assert!(matches!(
        result,
        Err(QuizClientError::Transport(TransportError::RateLimited))
    ));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn given_transport_error_after_malformed_completion_when_getting_quiz_then_returns_transport_error()
 {
    let transport = Arc::new(MockTransport::new([
        Ok(RawCompletion::new(TRUNCATED_QUIZ)),
        Err(TransportError::RequestFailed("HTTP 500".to_string())),
    ]));
    let client = QuizClient::new(Arc::clone(&transport), 2);

    let result = client.get_quiz(&request()).await;

    assert!(matches!(result, Err(QuizClientError::Transport(_))));
    assert_eq!(transport.call_count(), 2);
}
