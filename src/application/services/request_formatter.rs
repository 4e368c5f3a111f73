use crate::domain::{
    ChatMessage, GenerationParameters, GenerationRequest, MessageRole, RequestOverrides,
    ResponseFormat,
};

pub struct RequestFormatter {
    parameters: GenerationParameters,
}

impl RequestFormatter {
    pub fn new(parameters: GenerationParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &GenerationParameters {
        &self.parameters
    }

    pub fn prepare_request(&self, prompt: &str, role: MessageRole) -> GenerationRequest {
        self.prepare_request_with(prompt, role, RequestOverrides::default())
    }

    pub fn prepare_request_with(
        &self,
        prompt: &str,
        role: MessageRole,
        overrides: RequestOverrides,
    ) -> GenerationRequest {
        let params = &self.parameters;
        let response_format = if params.structured_output {
            ResponseFormat::JsonSchema
        } else {
            ResponseFormat::JsonObject
        };

        tracing::debug!(
            backend = ?params.backend,
            model = %params.model(),
            endpoint = %params.endpoint(),
            response_format = ?response_format,
            "Preparing generation request"
        );

        GenerationRequest::new(
            params.model(),
            params.endpoint(),
            params.system_prompt.as_str(),
            ChatMessage::new(role, prompt),
        )
        .with_sampling(params.sampling)
        .with_api_key(params.api_key.as_str())
        .with_response_format(response_format)
        .with_overrides(overrides)
    }
}
