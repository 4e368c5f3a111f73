use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::application::ports::{LlmTransport, TransportError};
use crate::domain::{GenerationRequest, RawCompletion};

/// Replays scripted replies in order, then falls back to a repeating reply
/// if one is set. Every request is recorded.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<RawCompletion, TransportError>>>,
    fallback: Option<RawCompletion>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockTransport {
    pub fn new(script: impl IntoIterator<Item = Result<RawCompletion, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn from_completions<S: Into<String>>(completions: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            completions
                .into_iter()
                .map(|c| Ok(RawCompletion::new(c))),
        )
    }

    pub fn repeating(completion: impl Into<String>) -> Self {
        Self {
            fallback: Some(RawCompletion::new(completion)),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl LlmTransport for MockTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<RawCompletion, TransportError> {
        lock(&self.requests).push(request.clone());

        let scripted = lock(&self.script).pop_front();
        match (scripted, &self.fallback) {
            (Some(reply), _) => reply,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(TransportError::InvalidResponse(
                "no scripted completion left".to_string(),
            )),
        }
    }
}
