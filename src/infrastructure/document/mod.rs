mod markdown_file_source;
mod static_document_source;

pub use markdown_file_source::{MarkdownFileSource, NOT_MARKDOWN_NOTICE, READ_FAILED_NOTICE};
pub use static_document_source::StaticDocumentSource;
