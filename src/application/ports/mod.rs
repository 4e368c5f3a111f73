mod document_source;
mod llm_transport;
mod notifier;
mod text_splitter;

pub use document_source::DocumentSource;
pub use llm_transport::{LlmTransport, TransportError};
pub use notifier::Notifier;
pub use text_splitter::TextSplitter;
