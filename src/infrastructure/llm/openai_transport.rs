use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use crate::application::ports::{LlmTransport, TransportError};
use crate::domain::{GenerationRequest, RawCompletion};

/// Chat-completions transport for OpenAI and OpenAI-compatible servers
/// (Ollama, LM Studio).
pub struct OpenAiCompatibleTransport {
    client: Client,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompatibleTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build_headers(request: &GenerationRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::RequestFailed(format!("header {}: {}", name, e)))?;
            let mut value = HeaderValue::from_str(&value)
                .map_err(|e| TransportError::RequestFailed(format!("header {}: {}", name, e)))?;
            if name == AUTHORIZATION {
                value.set_sensitive(true);
            }
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl LlmTransport for OpenAiCompatibleTransport {
    async fn send(&self, request: &GenerationRequest) -> Result<RawCompletion, TransportError> {
        let headers = Self::build_headers(request)?;

        tracing::debug!(
            endpoint = %request.endpoint,
            model = %request.model,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&request.endpoint)
            .json(&request.body())
            .headers(headers)
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::RequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

        completion_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(RawCompletion::new)
            .ok_or_else(|| TransportError::InvalidResponse("empty choices".to_string()))
    }
}
