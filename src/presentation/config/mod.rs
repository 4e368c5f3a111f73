mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{GenerationSettings, LlmSettings, LoggingSettings, Settings};
