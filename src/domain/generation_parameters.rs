use serde::Deserialize;

use super::SamplingParameters;
use super::quiz_schema::SYSTEM_PROMPT;

pub const DEFAULT_HOSTED_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:11434/v1/chat/completions";
pub const DEFAULT_HOSTED_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LOCAL_MODEL: &str = "llama3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    Local,
    #[default]
    Hosted,
}

/// Everything the request formatter needs to address a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParameters {
    pub backend: LlmBackend,
    pub hosted_model: String,
    pub local_model: String,
    pub hosted_endpoint: String,
    pub local_endpoint: String,
    pub api_key: String,
    pub sampling: SamplingParameters,
    pub structured_output: bool,
    pub system_prompt: String,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            hosted_model: DEFAULT_HOSTED_MODEL.to_string(),
            local_model: DEFAULT_LOCAL_MODEL.to_string(),
            hosted_endpoint: DEFAULT_HOSTED_ENDPOINT.to_string(),
            local_endpoint: DEFAULT_LOCAL_ENDPOINT.to_string(),
            api_key: String::new(),
            sampling: SamplingParameters::default(),
            structured_output: false,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl GenerationParameters {
    pub fn model(&self) -> &str {
        match self.backend {
            LlmBackend::Local => &self.local_model,
            LlmBackend::Hosted => &self.hosted_model,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self.backend {
            LlmBackend::Local => &self.local_endpoint,
            LlmBackend::Hosted => &self.hosted_endpoint,
        }
    }
}
