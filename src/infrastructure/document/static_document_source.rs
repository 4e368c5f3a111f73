use async_trait::async_trait;

use crate::application::ports::DocumentSource;

/// Serves a fixed text, or nothing.
pub struct StaticDocumentSource {
    text: Option<String>,
}

impl StaticDocumentSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn absent() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    async fn current_text(&self) -> Option<String> {
        self.text.clone()
    }
}
