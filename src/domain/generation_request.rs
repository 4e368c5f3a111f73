use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value, json};

use super::quiz_schema::{SCHEMA_NAME, json_schema};
use super::{ChatMessage, MessageRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Constrained decoding against the quiz schema.
    JsonSchema,
    /// JSON mode without a schema.
    JsonObject,
    #[default]
    Text,
}

impl ResponseFormat {
    pub fn to_json(self) -> Option<Value> {
        match self {
            ResponseFormat::JsonSchema => Some(json!({
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": json_schema(),
                },
            })),
            ResponseFormat::JsonObject => Some(json!({ "type": "json_object" })),
            ResponseFormat::Text => None,
        }
    }

    pub fn is_schema_constrained(self) -> bool {
        matches!(self, ResponseFormat::JsonSchema)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParameters {
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub max_tokens: u32,
}

impl Default for SamplingParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            frequency_penalty: 0.5,
            max_tokens: 3000,
        }
    }
}

/// Caller-supplied additions. Entries win over the values the formatter
/// derives from settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOverrides {
    pub body: Map<String, Value>,
    pub headers: BTreeMap<String, String>,
    pub endpoint: Option<String>,
}

impl RequestOverrides {
    pub fn with_body_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.body.insert(key.into(), value);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

#[derive(Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub endpoint: String,
    pub sampling: SamplingParameters,
    pub api_key: String,
    pub response_format: ResponseFormat,
    pub overrides: RequestOverrides,
    system: ChatMessage,
    prompt: ChatMessage,
}

impl GenerationRequest {
    pub fn new(
        model: impl Into<String>,
        endpoint: impl Into<String>,
        system_prompt: impl Into<String>,
        prompt: ChatMessage,
    ) -> Self {
        Self {
            model: model.into(),
            endpoint: endpoint.into(),
            sampling: SamplingParameters::default(),
            api_key: String::new(),
            response_format: ResponseFormat::default(),
            overrides: RequestOverrides::default(),
            system: ChatMessage::system(system_prompt),
            prompt,
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingParameters) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_response_format(mut self, response_format: ResponseFormat) -> Self {
        self.response_format = response_format;
        self
    }

    pub fn with_overrides(mut self, overrides: RequestOverrides) -> Self {
        if let Some(endpoint) = &overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        self.overrides = overrides;
        self
    }

    /// Same backend, model and sampling, with a new prompt message.
    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.prompt = ChatMessage::new(self.prompt.role, prompt);
        next
    }

    pub fn messages(&self) -> [&ChatMessage; 2] {
        [&self.system, &self.prompt]
    }

    pub fn system_message(&self) -> &ChatMessage {
        &self.system
    }

    pub fn prompt_message(&self) -> &ChatMessage {
        &self.prompt
    }

    pub fn prompt_role(&self) -> MessageRole {
        self.prompt.role
    }

    pub fn body(&self) -> Value {
        let messages: Vec<Value> = self
            .messages()
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.model));
        body.insert("max_tokens".to_string(), json!(self.sampling.max_tokens));
        body.insert("temperature".to_string(), json!(self.sampling.temperature));
        body.insert(
            "frequency_penalty".to_string(),
            json!(self.sampling.frequency_penalty),
        );
        body.insert("stream".to_string(), json!(false));
        body.insert("messages".to_string(), Value::Array(messages));
        if let Some(format) = self.response_format.to_json() {
            body.insert("response_format".to_string(), format);
        }

        for (key, value) in &self.overrides.body {
            body.insert(key.clone(), value.clone());
        }

        Value::Object(body)
    }

    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if !self.api_key.is_empty() {
            headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key),
            );
        }

        for (name, value) in &self.overrides.headers {
            headers.insert(name.clone(), value.clone());
        }

        headers
    }
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("sampling", &self.sampling)
            .field("api_key", &"[REDACTED]")
            .field("response_format", &self.response_format)
            .field("system", &self.system)
            .field("prompt", &self.prompt)
            .finish()
    }
}
