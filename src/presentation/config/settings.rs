use std::time::Duration;

use config::Environment as EnvironmentSource;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;

use super::Environment;
use crate::application::services::{
    DEFAULT_MAX_RETRIES, DEFAULT_PRUNE_TARGET, DEFAULT_QUESTIONS_PER_CHUNK, GenerationOptions,
};
use crate::domain::quiz_schema::SYSTEM_PROMPT;
use crate::domain::{
    DEFAULT_HOSTED_ENDPOINT, DEFAULT_HOSTED_MODEL, DEFAULT_LOCAL_ENDPOINT, DEFAULT_LOCAL_MODEL,
    GenerationParameters, LlmBackend, SamplingParameters,
};
use crate::infrastructure::text_processing::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub llm: LlmSettings,
    pub generation: GenerationSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone, Deserialize)]
pub struct LlmSettings {
    pub backend: LlmBackend,
    pub hosted_model: String,
    pub local_model: String,
    pub hosted_endpoint: String,
    pub local_endpoint: String,
    pub api_key: String,
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub max_tokens: u32,
    pub structured_output: bool,
    pub system_prompt: String,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("backend", &self.backend)
            .field("hosted_model", &self.hosted_model)
            .field("local_model", &self.local_model)
            .field("hosted_endpoint", &self.hosted_endpoint)
            .field("local_endpoint", &self.local_endpoint)
            .field("api_key", &"[REDACTED]")
            .field("temperature", &self.temperature)
            .field("frequency_penalty", &self.frequency_penalty)
            .field("max_tokens", &self.max_tokens)
            .field("structured_output", &self.structured_output)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationSettings {
    pub chunk_size: usize,
    pub questions_per_chunk: usize,
    pub prune_enabled: bool,
    pub prune_target: usize,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Loads defaults, then `appsettings.{env}` if present, then `APP_*`
    /// variables (`APP_LLM__API_KEY` sets `llm.api_key`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let configuration = Self::with_defaults(Config::builder())?
            .add_source(
                File::with_name(&environment.settings_file()).required(false),
            )
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        configuration.try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let sampling = SamplingParameters::default();
        builder
            .set_default("llm.backend", "hosted")?
            .set_default("llm.hosted_model", DEFAULT_HOSTED_MODEL)?
            .set_default("llm.local_model", DEFAULT_LOCAL_MODEL)?
            .set_default("llm.hosted_endpoint", DEFAULT_HOSTED_ENDPOINT)?
            .set_default("llm.local_endpoint", DEFAULT_LOCAL_ENDPOINT)?
            .set_default("llm.api_key", "")?
            .set_default("llm.temperature", f64::from(sampling.temperature))?
            .set_default("llm.frequency_penalty", f64::from(sampling.frequency_penalty))?
            .set_default("llm.max_tokens", i64::from(sampling.max_tokens))?
            .set_default("llm.structured_output", false)?
            .set_default("llm.system_prompt", SYSTEM_PROMPT)?
            .set_default("llm.request_timeout_secs", 120_i64)?
            .set_default("generation.chunk_size", DEFAULT_CHUNK_SIZE as i64)?
            .set_default(
                "generation.questions_per_chunk",
                DEFAULT_QUESTIONS_PER_CHUNK as i64,
            )?
            .set_default("generation.prune_enabled", false)?
            .set_default("generation.prune_target", DEFAULT_PRUNE_TARGET as i64)?
            .set_default("generation.max_retries", i64::from(DEFAULT_MAX_RETRIES))?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)
    }

    pub fn generation_parameters(&self) -> GenerationParameters {
        let llm = &self.llm;
        GenerationParameters {
            backend: llm.backend,
            hosted_model: llm.hosted_model.clone(),
            local_model: llm.local_model.clone(),
            hosted_endpoint: llm.hosted_endpoint.clone(),
            local_endpoint: llm.local_endpoint.clone(),
            api_key: llm.api_key.clone(),
            sampling: SamplingParameters {
                temperature: llm.temperature,
                frequency_penalty: llm.frequency_penalty,
                max_tokens: llm.max_tokens,
            },
            structured_output: llm.structured_output,
            system_prompt: llm.system_prompt.clone(),
        }
    }

    pub fn generation_options(&self) -> GenerationOptions {
        let generation = &self.generation;
        GenerationOptions {
            questions_per_chunk: Some(generation.questions_per_chunk).filter(|n| *n > 0),
            max_retries: generation.max_retries,
            prune_enabled: generation.prune_enabled,
            prune_target: generation.prune_target,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.request_timeout_secs)
    }
}
