pub mod document;
pub mod llm;
pub mod notification;
pub mod observability;
pub mod text_processing;
