use async_trait::async_trait;

use crate::domain::{GenerationRequest, RawCompletion};

#[async_trait]
pub trait LlmTransport: Send + Sync {
    async fn send(&self, request: &GenerationRequest) -> Result<RawCompletion, TransportError>;
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("api request failed: {0}")]
    RequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
